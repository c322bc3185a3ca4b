//! Domains bundled with the engine.
//!
//! Each one supplies the two callbacks the search needs; none of them is
//! required to use the engine with your own closures.

pub mod codegen;
pub mod tictactoe;

pub use codegen::{generate, Fragment, Template};
pub use tictactoe::{
    parse_cell, EvaluationStyle, Player, TicTacToe, TicTacToeEvaluator, TicTacToeState,
};
