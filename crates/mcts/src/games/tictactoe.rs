//! Tic-tac-toe as a successor-state domain.
//!
//! The engine sees a position only through its successors and a score, so
//! this module provides both: [`TicTacToe`] enumerates the boards reachable
//! in one move and [`TicTacToeEvaluator`] scores a board for one player.

use crate::evaluator::{ActionGenerator, Evaluator};
use mcts_core::{Game, MctsError, Result};
use std::fmt;
use std::str::FromStr;

/// The eight winning lines, as cell indices.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], // top row
    [3, 4, 5], // middle row
    [6, 7, 8], // bottom row
    [0, 3, 6], // left column
    [1, 4, 7], // center column
    [2, 5, 8], // right column
    [0, 4, 8], // main diagonal
    [2, 4, 6], // anti-diagonal
];

/// Tic-tac-toe player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opposing player.
    pub fn opposite(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

impl FromStr for Player {
    type Err = MctsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "x" | "X" => Ok(Player::X),
            "o" | "O" => Ok(Player::O),
            other => Err(MctsError::InvalidInput(format!("unknown player '{other}'"))),
        }
    }
}

/// Tic-tac-toe board.
///
/// Cells are indexed 0-8 (row-major). The player to move is derived from the
/// marks on the board: X moves whenever both players have the same count.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct TicTacToeState {
    board: [Option<Player>; 9],
}

impl TicTacToeState {
    /// Create a new empty board with X to move.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current player to move.
    pub fn current_player(&self) -> Player {
        if self.count(Player::X) == self.count(Player::O) {
            Player::X
        } else {
            Player::O
        }
    }

    /// Get the piece at a cell, if any.
    pub fn get(&self, cell: usize) -> Option<Player> {
        self.board.get(cell).copied().flatten()
    }

    pub fn count(&self, player: Player) -> usize {
        self.board.iter().filter(|c| **c == Some(player)).count()
    }

    /// Empty cells in ascending order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| i)
    }

    /// The player holding a complete line, if any.
    pub fn winner(&self) -> Option<Player> {
        LINES.iter().find_map(|line| {
            let first = self.board[line[0]]?;
            (self.board[line[1]] == Some(first) && self.board[line[2]] == Some(first))
                .then_some(first)
        })
    }

    /// Check if the board is full (draw if no winner).
    pub fn is_full(&self) -> bool {
        self.board.iter().all(|c| c.is_some())
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Whether `player` holds two cells of some line whose third cell is empty.
    pub fn has_open_pair(&self, player: Player) -> bool {
        LINES.iter().any(|line| {
            let marks = line.iter().filter(|&&c| self.board[c] == Some(player)).count();
            let empty = line.iter().filter(|&&c| self.board[c].is_none()).count();
            marks == 2 && empty == 1
        })
    }

    /// Board after the player to move marks `cell`.
    ///
    /// # Errors
    /// Returns `GameOver` if the game has ended, `InvalidCell` for an index
    /// outside 0-8, and `CellOccupied` for a taken cell.
    pub fn play(&self, cell: usize) -> Result<Self> {
        if self.is_over() {
            return Err(MctsError::GameOver);
        }
        if cell >= self.board.len() {
            return Err(MctsError::InvalidCell(cell));
        }
        if self.board[cell].is_some() {
            return Err(MctsError::CellOccupied(cell));
        }

        let mut next = *self;
        next.board[cell] = Some(self.current_player());
        Ok(next)
    }

    /// Every board reachable in one move, in cell order. Empty once the game is over.
    pub fn successors(&self) -> Vec<Self> {
        if self.is_over() {
            return Vec::new();
        }

        let mover = self.current_player();
        self.empty_cells()
            .map(|cell| {
                let mut next = *self;
                next.board[cell] = Some(mover);
                next
            })
            .collect()
    }

    /// The single cell in which `next` differs from this board.
    pub fn move_to(&self, next: &Self) -> Option<usize> {
        let mut changed = (0..9).filter(|&c| self.board[c] != next.board[c]);
        match (changed.next(), changed.next()) {
            (Some(cell), None) if self.board[cell].is_none() => Some(cell),
            _ => None,
        }
    }
}

/// Parses nine cells, row-major: `X`, `O`, and `.`, `-`, `_` or space for empty.
/// Row separators (`|`, `/`, newlines) are ignored.
impl FromStr for TicTacToeState {
    type Err = MctsError;

    fn from_str(s: &str) -> Result<Self> {
        let mut board = [None; 9];
        let mut len = 0;

        for ch in s.chars().filter(|c| !matches!(c, '|' | '/' | '\n' | '\r')) {
            if len == 9 {
                return Err(MctsError::InvalidInput(format!("more than 9 cells in '{s}'")));
            }
            board[len] = match ch {
                'X' | 'x' => Some(Player::X),
                'O' | 'o' => Some(Player::O),
                '.' | '-' | '_' | ' ' => None,
                other => {
                    return Err(MctsError::InvalidInput(format!("unexpected cell '{other}'")))
                }
            };
            len += 1;
        }

        if len != 9 {
            return Err(MctsError::InvalidInput(format!("expected 9 cells, got {len}")));
        }
        Ok(Self { board })
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "|---|---|---|")?;
            }
            for col in 0..3 {
                match self.board[row * 3 + col] {
                    Some(player) => write!(f, "| {player} ")?,
                    None => write!(f, "|   ")?,
                }
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

/// Parse a human move: a number 1-9, returned as a cell index 0-8.
pub fn parse_cell(input: &str) -> Result<usize> {
    let number: usize = input
        .trim()
        .parse()
        .map_err(|_| MctsError::InvalidInput(format!("'{}' is not a number between 1 and 9", input.trim())))?;

    match number {
        1..=9 => Ok(number - 1),
        _ => Err(MctsError::InvalidCell(number)),
    }
}

/// Tic-tac-toe game implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToe;

impl Game for TicTacToe {
    type State = TicTacToeState;
    type Player = Player;

    fn initial_state(&self) -> Self::State {
        TicTacToeState::new()
    }

    fn to_move(&self, state: &Self::State) -> Self::Player {
        state.current_player()
    }

    fn next_states(&self, state: &Self::State) -> Vec<Self::State> {
        state.successors()
    }

    fn winner(&self, state: &Self::State) -> Option<Self::Player> {
        state.winner()
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.is_over()
    }
}

impl ActionGenerator<TicTacToeState> for TicTacToe {
    fn successors(&self, state: &TicTacToeState) -> Vec<TicTacToeState> {
        state.successors()
    }
}

/// How [`TicTacToeEvaluator`] scores unfinished boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EvaluationStyle {
    /// Only finished games score: win 1, loss -1, draw 0.5, otherwise 0.
    #[default]
    Outcome,

    /// As `Outcome`, plus 0.5 for an own open pair and -0.3 for an
    /// opponent's open pair.
    Shaped,
}

/// Reward for a won board.
pub const WIN_REWARD: f32 = 1.0;
/// Reward for a lost board.
pub const LOSS_REWARD: f32 = -1.0;
/// Reward for a full board without a winner.
pub const DRAW_REWARD: f32 = 0.5;
/// Shaped reward for an own two-in-a-line with the third cell open.
pub const NEAR_WIN_REWARD: f32 = 0.5;
/// Shaped penalty for an opponent two-in-a-line with the third cell open.
pub const NEAR_LOSS_PENALTY: f32 = -0.3;

/// Scores boards from the point of view of one player.
#[derive(Clone, Copy, Debug)]
pub struct TicTacToeEvaluator {
    player: Player,
    style: EvaluationStyle,
}

impl TicTacToeEvaluator {
    pub fn new(player: Player, style: EvaluationStyle) -> Self {
        Self { player, style }
    }

    pub fn outcome(player: Player) -> Self {
        Self::new(player, EvaluationStyle::Outcome)
    }

    pub fn shaped(player: Player) -> Self {
        Self::new(player, EvaluationStyle::Shaped)
    }

    pub fn player(&self) -> Player {
        self.player
    }
}

impl Evaluator<TicTacToeState> for TicTacToeEvaluator {
    fn evaluate(&self, state: &TicTacToeState) -> f32 {
        match state.winner() {
            Some(winner) if winner == self.player => return WIN_REWARD,
            Some(_) => return LOSS_REWARD,
            None => {}
        }

        if state.is_full() {
            return DRAW_REWARD;
        }

        match self.style {
            EvaluationStyle::Outcome => 0.0,
            EvaluationStyle::Shaped => {
                if state.has_open_pair(self.player) {
                    NEAR_WIN_REWARD
                } else if state.has_open_pair(self.player.opposite()) {
                    NEAR_LOSS_PENALTY
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> TicTacToeState {
        s.parse().unwrap()
    }

    #[test]
    fn test_initial_state() {
        let game = TicTacToe;
        let state = game.initial_state();

        assert_eq!(state.current_player(), Player::X);
        assert!(state.winner().is_none());
        assert!(!game.is_terminal(&state));
    }

    #[test]
    fn test_successors_empty_board() {
        let state = TicTacToeState::new();
        let next = state.successors();

        assert_eq!(next.len(), 9);
        assert!(next.iter().all(|s| s.count(Player::X) == 1));
    }

    #[test]
    fn test_successors_partial_board() {
        let state = TicTacToeState::new().play(4).unwrap();
        let next = TicTacToe.successors(&state);

        assert_eq!(next.len(), 8);
        assert!(next.iter().all(|s| s.get(4) == Some(Player::X)));
        assert!(next.iter().all(|s| s.count(Player::O) == 1));
    }

    #[test]
    fn test_player_to_move_from_counts() {
        assert_eq!(board("X........").current_player(), Player::O);
        assert_eq!(board("XO.......").current_player(), Player::X);
    }

    #[test]
    fn test_play_errors() {
        let state = TicTacToeState::new().play(0).unwrap();

        assert_eq!(state.play(0), Err(MctsError::CellOccupied(0)));
        assert_eq!(state.play(9), Err(MctsError::InvalidCell(9)));

        let won = board("XXXOO....");
        assert_eq!(won.play(8), Err(MctsError::GameOver));
    }

    #[test]
    fn test_x_wins_top_row() {
        let mut state = TicTacToeState::new();
        for cell in [0, 3, 1, 4, 2] {
            state = state.play(cell).unwrap();
        }

        assert!(TicTacToe.is_terminal(&state));
        assert_eq!(state.winner(), Some(Player::X));
        assert!(state.successors().is_empty());
    }

    #[test]
    fn test_o_wins_diagonal() {
        let state = board("XXOXO.O..");
        assert_eq!(state.winner(), Some(Player::O));
    }

    #[test]
    fn test_draw() {
        // X O X
        // X X O
        // O X O
        let state = board("XOXXXOOXO");
        assert!(state.is_full());
        assert!(state.winner().is_none());
        assert!(TicTacToe.is_terminal(&state));
        assert!(state.successors().is_empty());
    }

    #[test]
    fn test_outcome_evaluator() {
        let eval = TicTacToeEvaluator::outcome(Player::O);

        assert_eq!(eval.evaluate(&board("XXOXO.O..")), WIN_REWARD);
        assert_eq!(eval.evaluate(&board("XXXOO....")), LOSS_REWARD);
        assert_eq!(eval.evaluate(&board("XOXXXOOXO")), DRAW_REWARD);
        assert_eq!(eval.evaluate(&board("XO.X.....")), 0.0);
    }

    #[test]
    fn test_shaped_evaluator() {
        let eval = TicTacToeEvaluator::shaped(Player::O);

        // No pairs on the board yet
        assert_eq!(eval.evaluate(&board("XO.......")), 0.0);
        // O pair 3-4 with 5 open
        assert_eq!(eval.evaluate(&board("XX.OO.X..")), NEAR_WIN_REWARD);
        // X pair 0-1 with 2 open, O has no pair
        assert_eq!(eval.evaluate(&board("XX..O....")), NEAR_LOSS_PENALTY);
    }

    #[test]
    fn test_move_to() {
        let state = board("X........");
        let next = state.play(4).unwrap();

        assert_eq!(state.move_to(&next), Some(4));
        assert_eq!(state.move_to(&state), None);
        assert_eq!(TicTacToeState::new().move_to(&board("XO.......")), None);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("1"), Ok(0));
        assert_eq!(parse_cell(" 9\n"), Ok(8));
        assert_eq!(parse_cell("0"), Err(MctsError::InvalidCell(0)));
        assert!(matches!(parse_cell("centre"), Err(MctsError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_board() {
        let state: TicTacToeState = "X.O|...|..X".parse().unwrap();
        assert_eq!(state.get(0), Some(Player::X));
        assert_eq!(state.get(2), Some(Player::O));
        assert_eq!(state.get(8), Some(Player::X));

        assert!("XO".parse::<TicTacToeState>().is_err());
        assert!("XOXOXOXOXO".parse::<TicTacToeState>().is_err());
        assert!("XOZ......".parse::<TicTacToeState>().is_err());
    }

    #[test]
    fn test_display() {
        let state = board("X...O....");
        let rendered = state.to_string();

        assert_eq!(
            rendered,
            "| X |   |   |\n|---|---|---|\n|   | O |   |\n|---|---|---|\n|   |   |   |\n"
        );
    }
}
