use std::fmt;

/// A turn-based game that can be played by the search engine.
///
/// The engine works on successor states directly, so a game does not expose
/// actions: every legal move is represented by the state it produces.
pub trait Game: Clone + Send + Sync {
    /// The game state (e.g. a board position). Successors are new values,
    /// never mutated in place.
    type State: Clone + Send + fmt::Debug;

    /// A participant in the game.
    type Player: Copy + Eq + Send + fmt::Debug + fmt::Display;

    /// Returns the initial game state
    fn initial_state(&self) -> Self::State;

    /// Returns the player who moves next from the given state
    fn to_move(&self, state: &Self::State) -> Self::Player;

    /// Returns every state reachable in one move. Empty for terminal states.
    fn next_states(&self, state: &Self::State) -> Vec<Self::State>;

    /// Returns the winner, if the game has one
    fn winner(&self, state: &Self::State) -> Option<Self::Player>;

    /// Returns true if the game has ended (win or draw)
    fn is_terminal(&self, state: &Self::State) -> bool;
}
