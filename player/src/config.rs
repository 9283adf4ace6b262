//! Configuration for the interactive player
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};
use engine_config::{load_config, CentralConfig};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_num_iterations() -> u32 {
    CENTRAL_CONFIG.mcts.num_iterations
}

fn default_human_first() -> bool {
    CENTRAL_CONFIG.player.human_first
}

fn default_show_statistics() -> bool {
    CENTRAL_CONFIG.player.show_statistics
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "player")]
#[command(about = "Play TicTacToe against a Monte Carlo Tree Search engine")]
#[command(
    long_about = "Interactive TicTacToe against an MCTS engine. Enter moves as \"row col\"
(0-2 each) or as a cell number 0-8. The engine keeps its search tree between
turns, so earlier thinking carries over.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// MCTS iterations per engine move
    #[arg(long, default_value_t = default_num_iterations())]
    pub num_iterations: u32,

    /// Seed for the engine's random source (defaults to config, then OS entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Cap on the number of search tree nodes
    #[arg(long)]
    pub max_nodes: Option<usize>,

    /// Whether the human moves first (plays X)
    #[arg(long, default_value_t = default_human_first(), action = ArgAction::Set)]
    pub human_first: bool,

    /// Print per-move visit counts and mean rewards after each engine move
    #[arg(long, default_value_t = default_show_statistics(), action = ArgAction::Set)]
    pub show_statistics: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.num_iterations == 0 {
            return Err(anyhow!("num_iterations must be greater than 0"));
        }

        if matches!(self.max_nodes, Some(n) if n < 2) {
            return Err(anyhow!(
                "max_nodes must be at least 2 to hold the root and one child"
            ));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Search settings, falling back to the central config for unset options.
    pub fn mcts_config(&self) -> mcts::MctsConfig {
        mcts::MctsConfig {
            num_iterations: self.num_iterations,
            seed: self.seed.or(CENTRAL_CONFIG.mcts.seed),
            max_nodes: self.max_nodes.or(CENTRAL_CONFIG.mcts.max_nodes),
        }
    }
}
