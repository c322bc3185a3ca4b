//! MCTS configuration parameters.
//!
//! These parameters control how long the search runs, when it stops early,
//! and which of the supported reward/answer modes it uses.

use mcts_core::{MctsError, Result};

/// Default number of search iterations.
pub const DEFAULT_ITERATIONS: usize = 50;

/// Score at or above which a state counts as won.
pub const DEFAULT_WIN_THRESHOLD: f32 = 1.0;

/// Per-level discount used by [`RewardMode::Discounted`] when none is given.
pub const DEFAULT_DISCOUNT: f32 = 0.9;

/// How the simulated reward is scaled before backpropagation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RewardMode {
    /// The raw evaluator score is backpropagated.
    Undiscounted,

    /// The score is multiplied by `factor^depth`, where depth is the number
    /// of ancestors of the simulated node.
    Discounted { factor: f32 },
}

/// Which node supplies the returned state once the budget is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerMode {
    /// The root child with the highest mean reward.
    BestRootChild,

    /// The node with the highest mean reward anywhere in the tree, root
    /// included, in pre-order.
    BestInTree,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug)]
pub struct MctsConfig {
    /// Number of select/expand/simulate/backpropagate iterations.
    pub iterations: usize,

    /// Root score at or above which search ends immediately.
    pub win_threshold: f32,

    /// Seed each new child's mean reward with the search evaluator.
    pub seed_children: bool,

    pub reward_mode: RewardMode,

    pub answer_mode: AnswerMode,

    /// Emit per-iteration debug events. Never changes the result.
    pub verbose: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            win_threshold: DEFAULT_WIN_THRESHOLD,
            seed_children: false,
            reward_mode: RewardMode::Undiscounted,
            answer_mode: AnswerMode::BestRootChild,
            verbose: false,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified number of iterations.
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    /// Switch to depth-discounted rewards.
    pub fn discounted(mut self, factor: f32) -> Self {
        self.reward_mode = RewardMode::Discounted { factor };
        self
    }

    /// Answer with the best node of the whole tree instead of the best root child.
    pub fn whole_tree(mut self) -> Self {
        self.answer_mode = AnswerMode::BestInTree;
        self
    }

    /// Seed new children with their evaluator score.
    pub fn seeded(mut self, seed_children: bool) -> Self {
        self.seed_children = seed_children;
        self
    }

    /// Emit per-iteration debug events.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Scale a simulated reward for a node at `depth` according to the reward mode.
    pub fn scale_reward(&self, reward: f32, depth: usize) -> f32 {
        match self.reward_mode {
            RewardMode::Undiscounted => reward,
            RewardMode::Discounted { factor } => {
                reward * factor.powi(i32::try_from(depth).unwrap_or(i32::MAX))
            }
        }
    }

    /// Check that the parameters describe a usable search.
    ///
    /// # Errors
    /// Returns `MctsError::InvalidConfig` if the win threshold is not finite
    /// or a discount factor lies outside (0, 1].
    pub fn validate(&self) -> Result<()> {
        if !self.win_threshold.is_finite() {
            return Err(MctsError::InvalidConfig(format!(
                "win threshold must be finite, got {}",
                self.win_threshold
            )));
        }

        if let RewardMode::Discounted { factor } = self.reward_mode {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(MctsError::InvalidConfig(format!(
                    "discount factor must be in (0, 1], got {}",
                    factor
                )));
            }
        }

        Ok(())
    }
}
