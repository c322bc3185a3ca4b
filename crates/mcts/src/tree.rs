//! Arena-allocated MCTS tree.
//!
//! Using a Vec<Node> with indices gives each node exclusive ownership of its
//! children (through the arena) while still allowing an O(1) step to the
//! parent during backpropagation, without Rc/RefCell cycles.

use crate::evaluator::{ActionGenerator, Evaluator};
use crate::node::{Node, NodeId};
use crate::policy::SelectionPolicy;

/// Seeded reward at which expansion stops creating further children.
pub const EXPANSION_CUTOFF: f32 = 1.0;

/// Arena-allocated MCTS tree.
///
/// Nodes are stored in a contiguous vector and referenced by [`NodeId`].
/// The root is always at [`NodeId::ROOT`]. Nodes are never removed; the
/// whole tree is dropped once a search is finished with it.
#[derive(Clone, Debug)]
pub struct Tree<S> {
    nodes: Vec<Node<S>>,
}

impl<S> Tree<S> {
    /// Create a new tree holding only a root with the given state.
    pub fn new(root_state: S) -> Self {
        Self {
            nodes: vec![Node::root(root_state)],
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.0]
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<S> {
        self.get(NodeId::ROOT)
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of `id` in generator order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Parent of `id`, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    /// Number of ancestors between a node and the root (root has depth 0).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    fn add_child(&mut self, parent: NodeId, state: S) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(state, Some(parent)));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Expand a node by creating one child per successor state.
    ///
    /// With a `seeder`, each child's mean reward is set to its score as it is
    /// created, and expansion stops right after the first child whose score
    /// reaches [`EXPANSION_CUTOFF`]. Without one, children start at 0.
    ///
    /// Expanding a node that already has children changes nothing and returns
    /// the existing children. An empty slice means the generator produced no
    /// candidates and the node stays a leaf.
    pub fn expand<A>(
        &mut self,
        id: NodeId,
        generator: &A,
        seeder: Option<&dyn Evaluator<S>>,
    ) -> &[NodeId]
    where
        A: ActionGenerator<S> + ?Sized,
    {
        if self.get(id).has_children() {
            return self.children(id);
        }

        let candidates = generator.successors(&self.get(id).state);
        for state in candidates {
            let seed = seeder.map(|evaluator| evaluator.evaluate(&state));
            let child = self.add_child(id, state);

            if let Some(score) = seed {
                self.get_mut(child).stats.seed(score);
                if score >= EXPANSION_CUTOFF {
                    break;
                }
            }
        }

        self.children(id)
    }

    /// Child of `id` chosen by `policy`, or `None` if `id` has no children.
    pub fn best_child<P>(&self, id: NodeId, policy: &P) -> Option<NodeId>
    where
        P: SelectionPolicy<S> + ?Sized,
    {
        let children = self.children(id);
        if children.is_empty() {
            return None;
        }
        policy.select(self, children)
    }

    /// Record `reward` at `id` and at every ancestor up to the root.
    ///
    /// The same reward is applied at each level.
    pub fn backpropagate(&mut self, id: NodeId, reward: f32) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.stats.record(reward);
            current = node.parent;
        }
    }

    /// Pre-order walk of the subtree rooted at `id`, children visited in
    /// insertion order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_, S> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }
}

/// Iterator returned by [`Tree::descendants`].
#[derive(Debug)]
pub struct Descendants<'a, S> {
    tree: &'a Tree<S>,
    stack: Vec<NodeId>,
}

impl<S> Iterator for Descendants<'_, S> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RewardRatioPolicy;

    fn digits(state: &String) -> Vec<String> {
        if state.len() >= 3 {
            return Vec::new();
        }
        (1..=3).map(|d| format!("{state}{d}")).collect()
    }

    #[test]
    fn test_tree_creation() {
        let tree = Tree::new(String::new());
        assert_eq!(tree.len(), 1); // Root node
        assert!(!tree.is_empty());
        assert!(tree.root().is_root());
        assert_eq!(tree.depth(NodeId::ROOT), 0);
    }

    #[test]
    fn test_expand_keeps_generator_order() {
        let mut tree = Tree::new(String::new());
        let children = tree.expand(NodeId::ROOT, &digits, None).to_vec();

        assert_eq!(children.len(), 3);
        let states: Vec<&str> = children.iter().map(|id| tree.get(*id).state.as_str()).collect();
        assert_eq!(states, vec!["1", "2", "3"]);
        for id in &children {
            assert_eq!(tree.parent(*id), Some(NodeId::ROOT));
            assert_eq!(tree.get(*id).mean_reward(), 0.0);
        }
    }

    #[test]
    fn test_expand_is_idempotent() {
        let mut tree = Tree::new(String::new());
        let first = tree.expand(NodeId::ROOT, &digits, None).to_vec();
        let second = tree.expand(NodeId::ROOT, &digits, None).to_vec();

        assert_eq!(first, second);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_expand_terminal_state_yields_nothing() {
        let mut tree = Tree::new("123".to_string());
        assert!(tree.expand(NodeId::ROOT, &digits, None).is_empty());
        assert!(!tree.root().has_children());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_expand_seeds_children() {
        let mut tree = Tree::new(String::new());
        let scorer = |s: &String| -> f32 { s.parse::<f32>().unwrap_or(0.0) / 10.0 };
        let children = tree.expand(NodeId::ROOT, &digits, Some(&scorer)).to_vec();

        assert_eq!(children.len(), 3);
        assert!((tree.get(children[1]).mean_reward() - 0.2).abs() < 1e-6);
        assert_eq!(tree.get(children[1]).visits(), 0);
    }

    #[test]
    fn test_expand_stops_at_winning_child() {
        let mut tree = Tree::new(String::new());
        let scorer = |s: &String| -> f32 { if s == "2" { 1.0 } else { 0.1 } };
        let children = tree.expand(NodeId::ROOT, &digits, Some(&scorer)).to_vec();

        // "3" is never created
        assert_eq!(children.len(), 2);
        assert_eq!(tree.get(children[1]).state, "2");
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_backpropagate_reaches_root() {
        let mut tree = Tree::new(String::new());
        let child = tree.expand(NodeId::ROOT, &digits, None)[0];
        let grandchild = tree.expand(child, &digits, None)[2];
        assert_eq!(tree.depth(grandchild), 2);

        tree.backpropagate(grandchild, 1.0);
        tree.backpropagate(child, 0.0);

        assert_eq!(tree.get(grandchild).visits(), 1);
        assert_eq!(tree.get(child).visits(), 2);
        assert_eq!(tree.root().visits(), 2);
        assert!((tree.get(child).mean_reward() - 0.5).abs() < 1e-6);
        assert!((tree.root().mean_reward() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_best_child() {
        let mut tree = Tree::new(String::new());
        assert_eq!(tree.best_child(NodeId::ROOT, &RewardRatioPolicy::default()), None);

        let children = tree.expand(NodeId::ROOT, &digits, None).to_vec();
        tree.backpropagate(children[1], 0.9);
        tree.backpropagate(children[2], 0.3);

        assert_eq!(
            tree.best_child(NodeId::ROOT, &RewardRatioPolicy::default()),
            Some(children[1])
        );
    }

    #[test]
    fn test_descendants_pre_order() {
        let mut tree = Tree::new(String::new());
        let children = tree.expand(NodeId::ROOT, &digits, None).to_vec();
        tree.expand(children[0], &digits, None);

        let states: Vec<String> = tree
            .descendants(NodeId::ROOT)
            .map(|id| tree.get(id).state.clone())
            .collect();
        assert_eq!(states, vec!["", "1", "11", "12", "13", "2", "3"]);
    }
}
