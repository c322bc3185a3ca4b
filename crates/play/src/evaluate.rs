//! Engine vs random-opponent evaluation.
//!
//! The engine plays O against an X that picks uniformly among its legal
//! moves. Games are independent and run in parallel.

use anyhow::{Context, Result};
use mcts_core::Game;
use mcts_engine::games::{EvaluationStyle, Player, TicTacToe, TicTacToeEvaluator};
use mcts_engine::{Mcts, MctsConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Side the engine plays in evaluation games.
pub const ENGINE_PLAYER: Player = Player::O;

/// A finished evaluation game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameRecord {
    pub winner: Option<Player>,
    pub moves: usize,
}

/// Aggregate results, written out as JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    pub games: usize,
    pub iterations: usize,
    pub seed: u64,
    pub engine_wins: usize,
    pub random_wins: usize,
    pub draws: usize,
    pub engine_win_rate: f64,
    /// Wins plus draws, as a fraction of all games.
    pub non_loss_rate: f64,
    pub average_moves: f64,
    pub elapsed_secs: f64,
}

impl EvaluationSummary {
    fn from_records(
        records: &[GameRecord],
        iterations: usize,
        seed: u64,
        elapsed_secs: f64,
    ) -> Self {
        let games = records.len();
        let engine_wins = records
            .iter()
            .filter(|r| r.winner == Some(ENGINE_PLAYER))
            .count();
        let random_wins = records
            .iter()
            .filter(|r| r.winner == Some(ENGINE_PLAYER.opposite()))
            .count();
        let draws = games - engine_wins - random_wins;
        let total_moves: usize = records.iter().map(|r| r.moves).sum();

        let fraction = |count: usize| {
            if games == 0 {
                0.0
            } else {
                count as f64 / games as f64
            }
        };

        Self {
            games,
            iterations,
            seed,
            engine_wins,
            random_wins,
            draws,
            engine_win_rate: fraction(engine_wins),
            non_loss_rate: fraction(engine_wins + draws),
            average_moves: fraction(total_moves),
            elapsed_secs,
        }
    }
}

/// Play one game: the engine as O, a seeded uniform-random X.
pub fn play_game(config: &MctsConfig, style: EvaluationStyle, seed: u64) -> GameRecord {
    let game = TicTacToe;
    let mcts = Mcts::new(
        config.clone(),
        game,
        TicTacToeEvaluator::new(ENGINE_PLAYER, style),
        ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
    );
    let mut opponent = ChaCha8Rng::seed_from_u64(seed);
    let mut state = game.initial_state();
    let mut moves = 0;

    while !game.is_terminal(&state) {
        let next = if game.to_move(&state) == ENGINE_PLAYER {
            mcts.search(state)
        } else {
            let options = game.next_states(&state);
            options[opponent.gen_range(0..options.len())]
        };

        // A zero budget returns the position unchanged
        if next == state {
            debug!(seed, moves, "no move found, ending game early");
            break;
        }
        state = next;
        moves += 1;
    }

    GameRecord {
        winner: game.winner(&state),
        moves,
    }
}

/// Play `games` evaluation games in parallel and summarise them.
pub fn run_evaluation(
    games: usize,
    config: &MctsConfig,
    style: EvaluationStyle,
    seed: u64,
) -> EvaluationSummary {
    info!(games, iterations = config.iterations, seed, "starting evaluation");
    let start = Instant::now();

    let records: Vec<GameRecord> = (0..games)
        .into_par_iter()
        .map(|i| play_game(config, style, seed.wrapping_add(i as u64 * 1000)))
        .collect();

    let summary = EvaluationSummary::from_records(
        &records,
        config.iterations,
        seed,
        start.elapsed().as_secs_f64(),
    );
    info!(
        engine_wins = summary.engine_wins,
        random_wins = summary.random_wins,
        draws = summary.draws,
        "evaluation finished"
    );
    summary
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary(summary: &EvaluationSummary, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .with_context(|| format!("Failed to write summary to {:?}", path))?;
    Ok(())
}

pub fn print_summary(summary: &EvaluationSummary) {
    let percent = |count: usize| {
        if summary.games == 0 {
            0.0
        } else {
            count as f64 / summary.games as f64 * 100.0
        }
    };

    println!("\n================================================");
    println!("EVALUATION RESULTS ({} iterations/move)", summary.iterations);
    println!("================================================");
    println!("Engine wins: {} ({:.1}%)", summary.engine_wins, percent(summary.engine_wins));
    println!("Random wins: {} ({:.1}%)", summary.random_wins, percent(summary.random_wins));
    println!("Draws:       {} ({:.1}%)", summary.draws, percent(summary.draws));
    println!("------------------------------------------------");
    println!("Non-loss rate: {:.1}%", summary.non_loss_rate * 100.0);
    println!("Average game length: {:.1} moves", summary.average_moves);
    println!("Completed in {:.2}s", summary.elapsed_secs);
}
