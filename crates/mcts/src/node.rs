//! MCTS node types for tree storage.
//!
//! Nodes live in an arena and refer to each other by index, so the parent
//! link is a plain handle rather than an owning or weak pointer.

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Search statistics for a single node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStats {
    /// Number of backpropagations that passed through this node.
    pub visits: u32,

    /// Running average of every reward backpropagated through this node.
    ///
    /// May hold a seed score from expansion while `visits` is still 0;
    /// the first recorded reward replaces it.
    pub mean_reward: f32,
}

impl NodeStats {
    /// Fresh statistics: no visits, zero mean.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the mean with an evaluator score without counting a visit.
    pub fn seed(&mut self, value: f32) {
        self.mean_reward = value;
    }

    /// Fold one reward into the running mean.
    ///
    /// mean += (reward - mean) / visits
    pub fn record(&mut self, reward: f32) {
        self.visits += 1;
        self.mean_reward += (reward - self.mean_reward) / self.visits as f32;
    }
}

/// A node in the MCTS tree.
///
/// Each node wraps one state of the decision process together with the
/// statistics accumulated for it during search.
#[derive(Clone, Debug)]
pub struct Node<S> {
    /// The state this node represents. Never mutated once attached.
    pub state: S,

    /// Back-reference used for the upward walk; `None` only for the root.
    pub parent: Option<NodeId>,

    /// Children in the order the action generator produced them.
    pub children: Vec<NodeId>,

    /// Visit count and mean reward.
    pub stats: NodeStats,
}

impl<S> Node<S> {
    /// Create a new unexpanded node.
    pub fn new(state: S, parent: Option<NodeId>) -> Self {
        Self {
            state,
            parent,
            children: Vec::new(),
            stats: NodeStats::new(),
        }
    }

    /// Create the root node.
    pub fn root(state: S) -> Self {
        Self::new(state, None)
    }

    /// Whether this node has been expanded.
    ///
    /// A node with any children counts as fully expanded; there is no
    /// partially expanded state.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// True only for the node without a parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of rewards recorded at this node.
    pub fn visits(&self) -> u32 {
        self.stats.visits
    }

    /// Running mean of the recorded rewards (or the seed, before any visit).
    pub fn mean_reward(&self) -> f32 {
        self.stats.mean_reward
    }
}
