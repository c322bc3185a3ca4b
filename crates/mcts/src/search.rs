//! Monte Carlo Tree Search implementation.
//!
//! Each iteration runs four phases against an arena tree:
//! 1. Selection: descend with the selection policy until a childless node
//! 2. Expansion: create that node's children, pick one uniformly at random
//! 3. Simulation: score the reached node once with the evaluator
//! 4. Backpropagation: fold the score into every ancestor's running mean

use crate::{
    config::{AnswerMode, MctsConfig, RewardMode},
    evaluator::{ActionGenerator, Evaluator},
    node::NodeId,
    policy::{RandomPolicy, RewardRatioPolicy, SelectionPolicy},
    tree::Tree,
};
use rand::Rng;
use std::fmt;
use tracing::debug;

/// How a search produced its answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The root already scored at or above the win threshold; returned unchanged.
    ImmediateWin,

    /// A node chosen by the answer mode supplied the state.
    BestMove,

    /// The root never gained children; its state is returned unchanged.
    NoContinuation,
}

/// Result of an MCTS search.
#[derive(Clone, Debug)]
pub struct SearchResult<S> {
    /// The chosen next state.
    pub state: S,

    pub outcome: SearchOutcome,

    /// Completed select/expand/simulate/backpropagate iterations.
    pub iterations_run: usize,

    /// Number of nodes in the tree when the search finished.
    pub tree_size: usize,

    /// Visit count of the root when the search finished.
    pub root_visits: u32,
}

impl<S> SearchResult<S> {
    pub fn into_state(self) -> S {
        self.state
    }
}

/// Monte Carlo Tree Search over caller-supplied callbacks.
///
/// Generic over:
/// - `A`: the action generator (successor states)
/// - `E`: the evaluator (scalar score, also used to seed children when enabled)
/// - `R`: the random number generator behind the expansion pick
pub struct Mcts<A, E, R: Rng> {
    config: MctsConfig,
    actions: A,
    evaluator: E,
    expansion_policy: RandomPolicy<R>,
}

impl<A, E, R: Rng> Mcts<A, E, R> {
    /// Create a new MCTS instance.
    pub fn new(config: MctsConfig, actions: A, evaluator: E, rng: R) -> Self {
        Self {
            config,
            actions,
            evaluator,
            expansion_policy: RandomPolicy::new(rng),
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Search from `root_state` with the reward-ratio descent policy and
    /// return the chosen next state.
    ///
    /// The tree is built for this call only and dropped afterwards.
    pub fn search<S>(&self, root_state: S) -> S
    where
        A: ActionGenerator<S>,
        E: Evaluator<S>,
        S: Clone + fmt::Debug,
    {
        self.search_with(root_state, &RewardRatioPolicy::default())
    }

    /// Search from `root_state` descending with a custom policy.
    pub fn search_with<S, P>(&self, root_state: S, policy: &P) -> S
    where
        A: ActionGenerator<S>,
        E: Evaluator<S>,
        S: Clone + fmt::Debug,
        P: SelectionPolicy<S> + ?Sized,
    {
        let mut tree = Tree::new(root_state);
        self.search_tree(&mut tree, policy).into_state()
    }

    /// Run the search loop against a caller-owned tree.
    ///
    /// The tree is expected to be fresh (a root only); its statistics are left
    /// in place afterwards so they can be inspected.
    pub fn search_tree<S, P>(&self, tree: &mut Tree<S>, policy: &P) -> SearchResult<S>
    where
        A: ActionGenerator<S>,
        E: Evaluator<S>,
        S: Clone + fmt::Debug,
        P: SelectionPolicy<S> + ?Sized,
    {
        // The root state never changes during a search, so one check covers
        // every iteration, including a zero budget.
        let root_score = self.evaluator.evaluate(&tree.root().state);
        if root_score >= self.config.win_threshold {
            if self.config.verbose {
                debug!(score = root_score, "winning state found at root");
            }
            return self.finish(tree, tree.root().state.clone(), SearchOutcome::ImmediateWin, 0);
        }

        for _ in 0..self.config.iterations {
            let leaf = self.select(tree, policy);
            let node = self.expand(tree, leaf);
            let reward = self.simulate(tree, node);
            tree.backpropagate(node, reward);

            if self.config.verbose {
                debug!(reward, "backpropagated reward to root");
            }
        }

        let (state, outcome) = self.answer(tree);
        if self.config.verbose {
            debug!(state = ?state, ?outcome, "best move after search");
        }
        self.finish(tree, state, outcome, self.config.iterations)
    }

    /// Descend from the root while the current node has children.
    fn select<S, P>(&self, tree: &Tree<S>, policy: &P) -> NodeId
    where
        P: SelectionPolicy<S> + ?Sized,
    {
        let mut current = NodeId::ROOT;

        while tree.get(current).has_children() {
            match tree.best_child(current, policy) {
                Some(child) => current = child,
                None => {
                    if self.config.verbose {
                        debug!("no valid child available during selection");
                    }
                    break;
                }
            }
        }

        current
    }

    /// Expand a childless leaf and return one new child picked at random.
    ///
    /// Returns the leaf itself when it already has children (the policy
    /// declined to descend) or when the generator yields nothing.
    fn expand<S>(&self, tree: &mut Tree<S>, leaf: NodeId) -> NodeId
    where
        A: ActionGenerator<S>,
        E: Evaluator<S>,
        S: fmt::Debug,
    {
        if tree.get(leaf).has_children() {
            return leaf;
        }

        let seeder: Option<&dyn Evaluator<S>> = if self.config.seed_children {
            Some(&self.evaluator)
        } else {
            None
        };

        let children = tree.expand(leaf, &self.actions, seeder);
        let picked = self
            .expansion_policy
            .pick_index(children.len())
            .map(|i| children[i]);

        match picked {
            Some(child) => {
                if self.config.verbose {
                    debug!(state = ?tree.get(child).state, "expanded node");
                }
                child
            }
            None => leaf,
        }
    }

    /// Score a node once, scaled by the configured reward mode.
    fn simulate<S>(&self, tree: &Tree<S>, node: NodeId) -> f32
    where
        E: Evaluator<S>,
        S: fmt::Debug,
    {
        let raw = self.evaluator.evaluate(&tree.get(node).state);
        let reward = match self.config.reward_mode {
            RewardMode::Undiscounted => raw,
            RewardMode::Discounted { .. } => self.config.scale_reward(raw, tree.depth(node)),
        };

        if self.config.verbose {
            debug!(state = ?tree.get(node).state, reward, "evaluated state");
        }
        reward
    }

    /// Pick the returned state according to the answer mode.
    fn answer<S: Clone>(&self, tree: &Tree<S>) -> (S, SearchOutcome) {
        let root = tree.root();
        if !root.has_children() {
            return (root.state.clone(), SearchOutcome::NoContinuation);
        }

        let best = match self.config.answer_mode {
            AnswerMode::BestRootChild => highest_mean(tree, root.children.iter().copied()),
            AnswerMode::BestInTree => highest_mean(tree, tree.descendants(NodeId::ROOT)),
        };

        match best {
            Some(id) => (tree.get(id).state.clone(), SearchOutcome::BestMove),
            None => (root.state.clone(), SearchOutcome::NoContinuation),
        }
    }

    fn finish<S>(
        &self,
        tree: &Tree<S>,
        state: S,
        outcome: SearchOutcome,
        iterations_run: usize,
    ) -> SearchResult<S> {
        SearchResult {
            state,
            outcome,
            iterations_run,
            tree_size: tree.len(),
            root_visits: tree.root().visits(),
        }
    }
}

impl<A, E, R: Rng> fmt::Debug for Mcts<A, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mcts")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// First node with the strictly highest mean reward.
fn highest_mean<S>(tree: &Tree<S>, ids: impl Iterator<Item = NodeId>) -> Option<NodeId> {
    let mut best: Option<(NodeId, f32)> = None;
    for id in ids {
        let mean = tree.get(id).mean_reward();
        match best {
            Some((_, best_mean)) if mean <= best_mean => {}
            _ => best = Some((id, mean)),
        }
    }
    best.map(|(id, _)| id)
}
