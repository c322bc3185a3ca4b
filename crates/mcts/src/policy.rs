//! Child selection policies.
//!
//! A policy picks one node out of a set of sibling candidates. The search
//! uses two of them:
//! - [`RewardRatioPolicy`] while descending the tree
//! - [`RandomPolicy`] to pick which freshly expanded child gets scored

use crate::node::{NodeId, NodeStats};
use crate::tree::Tree;
use rand::Rng;
use std::cell::RefCell;

/// Default guard added to the visit count in [`reward_ratio`].
pub const DEFAULT_EPSILON: f32 = 1e-6;

/// Chooses one of `candidates`, or `None` when there is nothing to choose.
pub trait SelectionPolicy<S> {
    fn select(&self, tree: &Tree<S>, candidates: &[NodeId]) -> Option<NodeId>;
}

impl<S, F> SelectionPolicy<S> for F
where
    F: Fn(&Tree<S>, &[NodeId]) -> Option<NodeId>,
{
    fn select(&self, tree: &Tree<S>, candidates: &[NodeId]) -> Option<NodeId> {
        self(tree, candidates)
    }
}

/// mean_reward / (visits + epsilon)
///
/// An unvisited child scores its seed divided by epsilon, so a positive seed
/// dominates and a zero seed scores 0.
pub fn reward_ratio(stats: &NodeStats, epsilon: f32) -> f32 {
    stats.mean_reward / (stats.visits as f32 + epsilon)
}

/// Greedy descent policy: argmax of [`reward_ratio`].
///
/// There is no exploration bonus; already good nodes are preferred over
/// unexplored ones. Ties go to the first candidate.
#[derive(Clone, Copy, Debug)]
pub struct RewardRatioPolicy {
    pub epsilon: f32,
}

impl RewardRatioPolicy {
    pub fn new(epsilon: f32) -> Self {
        Self { epsilon }
    }
}

impl Default for RewardRatioPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl<S> SelectionPolicy<S> for RewardRatioPolicy {
    fn select(&self, tree: &Tree<S>, candidates: &[NodeId]) -> Option<NodeId> {
        let mut best = None;
        let mut best_score = f32::NEG_INFINITY;

        for &id in candidates {
            let score = reward_ratio(&tree.get(id).stats, self.epsilon);
            if best.is_none() || score > best_score {
                best = Some(id);
                best_score = score;
            }
        }

        best
    }
}

/// Uniform choice among the candidates.
///
/// The RNG sits in a RefCell so that selection can take `&self` like every
/// other policy.
#[derive(Debug)]
pub struct RandomPolicy<R: Rng> {
    rng: RefCell<R>,
}

impl<R: Rng> RandomPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng: RefCell::new(rng),
        }
    }

    /// Index in `0..len`, or `None` for an empty range.
    pub fn pick_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.borrow_mut().gen_range(0..len))
    }
}

impl<S, R: Rng> SelectionPolicy<S> for RandomPolicy<R> {
    fn select(&self, _tree: &Tree<S>, candidates: &[NodeId]) -> Option<NodeId> {
        self.pick_index(candidates.len()).map(|i| candidates[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn star(width: u8) -> (Tree<u8>, Vec<NodeId>) {
        let mut tree = Tree::new(0u8);
        let generator = move |_: &u8| (1..=width).collect::<Vec<u8>>();
        let children = tree.expand(NodeId::ROOT, &generator, None).to_vec();
        (tree, children)
    }

    #[test]
    fn test_reward_ratio() {
        let mut stats = NodeStats::new();
        assert_eq!(reward_ratio(&stats, DEFAULT_EPSILON), 0.0);

        stats.record(0.5);
        stats.record(0.5);
        assert!((reward_ratio(&stats, DEFAULT_EPSILON) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_reward_ratio_prefers_best_ratio() {
        let (mut tree, children) = star(3);
        tree.backpropagate(children[0], 0.4);
        tree.backpropagate(children[1], 1.0);
        tree.backpropagate(children[1], 1.0);
        tree.backpropagate(children[2], 0.6);

        // 0.4 / 1, 1.0 / 2, 0.6 / 1
        let chosen = RewardRatioPolicy::default().select(&tree, &children);
        assert_eq!(chosen, Some(children[2]));
    }

    #[test]
    fn test_reward_ratio_ties_go_to_first() {
        let (tree, children) = star(4);
        let chosen = RewardRatioPolicy::default().select(&tree, &children);
        assert_eq!(chosen, Some(children[0]));
    }

    #[test]
    fn test_reward_ratio_all_negative() {
        let (mut tree, children) = star(2);
        tree.backpropagate(children[0], -1.0);
        tree.backpropagate(children[1], -0.5);

        let chosen = RewardRatioPolicy::default().select(&tree, &children);
        assert_eq!(chosen, Some(children[1]));
    }

    #[test]
    fn test_seeded_unvisited_child_dominates() {
        let (mut tree, children) = star(2);
        tree.backpropagate(children[0], 1.0);
        tree.get_mut(children[1]).stats.seed(0.1);

        let chosen = RewardRatioPolicy::default().select(&tree, &children);
        assert_eq!(chosen, Some(children[1]));
    }

    #[test]
    fn test_empty_candidates() {
        let (tree, _) = star(2);
        assert_eq!(RewardRatioPolicy::default().select(&tree, &[]), None);

        let random = RandomPolicy::new(ChaCha8Rng::seed_from_u64(1));
        assert_eq!(random.select(&tree, &[]), None);
    }

    #[test]
    fn test_random_policy_deterministic_with_seed() {
        let (tree, children) = star(5);
        let picks = |seed: u64| {
            let policy = RandomPolicy::new(ChaCha8Rng::seed_from_u64(seed));
            (0..20)
                .map(|_| policy.select(&tree, &children))
                .collect::<Vec<_>>()
        };

        assert_eq!(picks(7), picks(7));
        assert!(picks(7).iter().all(|p| p.is_some()));
    }

    #[test]
    fn test_closure_policy() {
        let (tree, children) = star(3);
        let last = |_: &Tree<u8>, candidates: &[NodeId]| candidates.last().copied();
        assert_eq!(tree.best_child(NodeId::ROOT, &last), Some(children[2]));
    }
}
