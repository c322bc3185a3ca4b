//! Human vs engine tic-tac-toe over a line-based reader and writer.

use anyhow::{bail, Context, Result};
use mcts_core::{Game, MctsError};
use mcts_engine::games::{
    parse_cell, EvaluationStyle, Player, TicTacToe, TicTacToeEvaluator, TicTacToeState,
};
use mcts_engine::{Mcts, MctsConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{BufRead, Write};
use tracing::info;

/// Settings for an interactive session.
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub config: MctsConfig,
    pub engine_player: Player,
    pub style: EvaluationStyle,
    pub seed: u64,
}

/// How one game of a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Won(Player),
    Draw,
    /// Input ran out mid-game.
    Abandoned,
}

/// Play games until the human declines a replay or input runs out.
pub fn run_session<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    settings: &SessionSettings,
) -> Result<Vec<GameOutcome>> {
    let mut outcomes = Vec::new();

    for round in 0u64.. {
        let outcome = play_game(input, output, settings, settings.seed.wrapping_add(round))?;
        outcomes.push(outcome);
        info!(round, ?outcome, "game finished");

        if outcome == GameOutcome::Abandoned || !ask_replay(input, output)? {
            writeln!(output, "Thanks for playing!")?;
            break;
        }
    }

    Ok(outcomes)
}

fn play_game<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    settings: &SessionSettings,
    seed: u64,
) -> Result<GameOutcome> {
    let game = TicTacToe;
    let evaluator = TicTacToeEvaluator::new(settings.engine_player, settings.style);
    let mcts = Mcts::new(
        settings.config.clone(),
        game,
        evaluator,
        ChaCha8Rng::seed_from_u64(seed),
    );
    let human = settings.engine_player.opposite();
    let mut state = game.initial_state();

    writeln!(
        output,
        "You are {human}. Cells are numbered 1-9, left to right, top to bottom."
    )?;

    while !game.is_terminal(&state) {
        if game.to_move(&state) == human {
            write!(output, "\n{state}\n")?;
            match prompt_move(input, output, &state)? {
                Some(next) => state = next,
                None => return Ok(GameOutcome::Abandoned),
            }
        } else {
            let next = mcts.search(state);
            let Some(cell) = state.move_to(&next) else {
                bail!(
                    "engine found no move from\n{state}(is the iteration budget zero?)"
                );
            };
            info!(cell = cell + 1, "engine moved");
            writeln!(output, "Engine plays {}", cell + 1)?;
            state = next;
        }
    }

    write!(output, "\n{state}\n")?;
    let outcome = match game.winner(&state) {
        Some(player) => {
            writeln!(output, "Player {player} wins!")?;
            GameOutcome::Won(player)
        }
        None => {
            writeln!(output, "It's a draw!")?;
            GameOutcome::Draw
        }
    };
    Ok(outcome)
}

/// Ask until the human enters a legal move. `None` on end of input.
fn prompt_move<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    state: &TicTacToeState,
) -> Result<Option<TicTacToeState>> {
    loop {
        write!(output, "Enter your move (1-9): ")?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };

        match parse_cell(&line).and_then(|cell| state.play(cell)) {
            Ok(next) => return Ok(Some(next)),
            Err(MctsError::CellOccupied(cell)) => {
                writeln!(output, "Cell {} is already taken. Try again.", cell + 1)?
            }
            Err(err) => writeln!(output, "{err}. Enter a number between 1 and 9.")?,
        }
    }
}

fn ask_replay<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "Do you want to play again? (y/n): ")?;
    output.flush()?;

    Ok(read_line(input)?.is_some_and(|answer| answer.trim().eq_ignore_ascii_case("y")))
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Failed to read player input")?;
    Ok((read > 0).then_some(line))
}
