//! Monte Carlo Tree Search over successor states.
//!
//! This crate provides a domain-agnostic MCTS engine. A caller supplies two
//! callbacks and gets back the chosen next state:
//!
//! - an [`ActionGenerator`]: state -> candidate successor states
//! - an [`Evaluator`]: state -> scalar score (higher is better)
//!
//! # Features
//!
//! - **Arena tree**: nodes referenced by [`NodeId`], parent links without `Rc` cycles
//! - **Greedy descent**: reward/visit ratio selection ([`RewardRatioPolicy`])
//! - **Random expansion pick**: one new child is scored per iteration
//! - **Immediate win**: a root scoring at the win threshold ends the search
//! - **Alternative modes**: depth-discounted rewards, whole-tree answers
//!
//! # Example
//!
//! ```
//! use mcts_engine::{Mcts, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! // Count towards 5 in steps of 1 or 2
//! let successors = |n: &u8| (1..=2).map(|s| n + s).filter(|m| *m <= 5).collect::<Vec<u8>>();
//! let score = |n: &u8| -> f32 { *n as f32 / 5.0 };
//!
//! let config = MctsConfig::with_iterations(100);
//! let mcts = Mcts::new(config, successors, score, ChaCha8Rng::seed_from_u64(42));
//!
//! let next = mcts.search(0u8);
//! assert!(next == 1 || next == 2);
//! ```

pub mod config;
pub mod evaluator;
pub mod games;
pub mod node;
pub mod policy;
pub mod search;
pub mod tree;

pub use config::{
    AnswerMode, MctsConfig, RewardMode, DEFAULT_DISCOUNT, DEFAULT_ITERATIONS, DEFAULT_WIN_THRESHOLD,
};
pub use evaluator::{ActionGenerator, Evaluator};
pub use node::{Node, NodeId, NodeStats};
pub use policy::{RandomPolicy, RewardRatioPolicy, SelectionPolicy};
pub use search::{Mcts, SearchOutcome, SearchResult};
pub use tree::{Tree, EXPANSION_CUTOFF};
