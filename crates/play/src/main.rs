//! Command-line driver for the MCTS engine.
//!
//! Plays tic-tac-toe against a human, assembles a small program from a
//! weighted template, and measures the engine against a random opponent.

mod evaluate;
mod interactive;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use interactive::SessionSettings;
use mcts_engine::games::{generate, EvaluationStyle, Player, Template};
use mcts_engine::MctsConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Generic MCTS engine demos and evaluation.
#[derive(Parser)]
#[command(name = "mcts-play")]
#[command(about = "Play against, generate with, and evaluate a generic MCTS engine")]
struct Cli {
    /// Log every search iteration (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play tic-tac-toe against the engine on stdin/stdout.
    Tictactoe {
        /// Search iterations per engine move.
        #[arg(short, long, default_value = "500")]
        iterations: usize,

        /// Side the engine plays (x moves first).
        #[arg(long, default_value = "o")]
        engine_plays: Player,

        /// Reward open two-in-a-lines instead of finished games only.
        #[arg(long)]
        shaped: bool,

        /// Seed new children with their score as they are created.
        #[arg(long)]
        seed_children: bool,

        /// Discount rewards by this factor per tree level.
        #[arg(long)]
        discount: Option<f32>,

        /// Answer with the best node anywhere in the tree.
        #[arg(long)]
        whole_tree: bool,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Build the even-number printing program line by line.
    Codegen {
        /// Search iterations per line.
        #[arg(short, long, default_value = "100")]
        iterations: usize,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Play the engine (as O) against a uniformly random X.
    Evaluate {
        /// Number of games to play.
        #[arg(short, long, default_value = "100")]
        games: usize,

        /// Search iterations per engine move.
        #[arg(short, long, default_value = "200")]
        iterations: usize,

        /// Reward open two-in-a-lines instead of finished games only.
        #[arg(long)]
        shaped: bool,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Write the summary as JSON to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn evaluation_style(shaped: bool) -> EvaluationStyle {
    if shaped {
        EvaluationStyle::Shaped
    } else {
        EvaluationStyle::Outcome
    }
}

/// Assemble and validate a search configuration from command-line flags.
fn build_config(
    iterations: usize,
    verbose: bool,
    seed_children: bool,
    discount: Option<f32>,
    whole_tree: bool,
) -> Result<MctsConfig> {
    let mut config = MctsConfig::with_iterations(iterations)
        .seeded(seed_children)
        .verbose(verbose);
    if let Some(factor) = discount {
        config = config.discounted(factor);
    }
    if whole_tree {
        config = config.whole_tree();
    }

    config.validate().context("Invalid search configuration")?;
    Ok(config)
}

fn cmd_tictactoe(settings: SessionSettings) -> Result<()> {
    info!(
        iterations = settings.config.iterations,
        engine = %settings.engine_player,
        style = ?settings.style,
        "starting tic-tac-toe"
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    interactive::run_session(&mut input, &mut output, &settings)?;
    Ok(())
}

fn cmd_codegen(config: MctsConfig, seed: u64) {
    let start = Instant::now();
    let template = Template::even_numbers();
    let program = generate(&template, config, ChaCha8Rng::seed_from_u64(seed));

    info!(
        score = template.score(&program),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "program generated"
    );
    println!("{program}");
}

fn cmd_evaluate(
    games: usize,
    config: MctsConfig,
    style: EvaluationStyle,
    seed: u64,
    output: Option<PathBuf>,
) -> Result<()> {
    let summary = evaluate::run_evaluation(games, &config, style, seed);
    evaluate::print_summary(&summary);

    if let Some(path) = output {
        evaluate::write_summary(&summary, &path)?;
        println!("Summary saved to: {:?}", path);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "debug" } else { "info" });

    match cli.command {
        Commands::Tictactoe {
            iterations,
            engine_plays,
            shaped,
            seed_children,
            discount,
            whole_tree,
            seed,
        } => {
            let config = build_config(iterations, cli.verbose, seed_children, discount, whole_tree)?;
            cmd_tictactoe(SessionSettings {
                config,
                engine_player: engine_plays,
                style: evaluation_style(shaped),
                seed,
            })
        }

        Commands::Codegen { iterations, seed } => {
            let config = build_config(iterations, cli.verbose, false, None, false)?;
            cmd_codegen(config, seed);
            Ok(())
        }

        Commands::Evaluate {
            games,
            iterations,
            shaped,
            seed,
            output,
        } => {
            let config = build_config(iterations, cli.verbose, false, None, false)?;
            cmd_evaluate(games, config, evaluation_style(shaped), seed, output)
        }
    }
}
