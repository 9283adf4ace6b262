//! Player - interactive TicTacToe against the MCTS engine
//!
//! Reads moves from stdin, answers with the engine's choice after the
//! configured number of search iterations, and prints the board after every
//! move until the game ends.

use anyhow::Result;
use clap::Parser;
use std::io;
use tracing::info;

mod config;
mod game;

use crate::config::Config;
use crate::game::Match;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so they never interleave with the board on stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let mcts_config = config.mcts_config();
    info!(
        num_iterations = mcts_config.num_iterations,
        seed = ?mcts_config.seed,
        max_nodes = ?mcts_config.max_nodes,
        human_first = config.human_first,
        "Starting game"
    );

    let stdin = io::stdin();
    let mut game = Match::new(
        stdin.lock(),
        io::stdout(),
        mcts_config,
        config.human_first,
        config.show_statistics,
    )?;
    let outcome = game.play()?;

    info!(?outcome, "Game finished");
    Ok(())
}
