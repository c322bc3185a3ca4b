//! MCTS Core - shared error type and turn-based game abstraction
//!
//! The search engine itself only needs two callbacks (a successor generator
//! and a scoring function). This crate holds what the drivers around it share:
//!
//! - [`Game`] - Trait for turn-based games that can be driven by the engine
//! - [`MctsError`] - Errors raised by configuration and move input

mod error;
mod game;

pub use error::{MctsError, Result};
pub use game::Game;
