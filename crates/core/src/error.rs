use thiserror::Error;

/// Errors that can occur around the search engine.
///
/// The search loop itself never fails; these cover configuration checks
/// and moves coming from outside the engine (e.g. a human player).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MctsError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid cell: {0}")]
    InvalidCell(usize),

    #[error("Cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("Game is already over")]
    GameOver,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience Result type for MCTS operations
pub type Result<T> = std::result::Result<T, MctsError>;
