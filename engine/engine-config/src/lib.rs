//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! by the search engine's front ends.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`TREESEARCH_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! TREESEARCH_<SECTION>_<KEY>=value
//!
//! Examples:
//!     TREESEARCH_COMMON_LOG_LEVEL=debug
//!     TREESEARCH_MCTS_NUM_ITERATIONS=20000
//!     TREESEARCH_MCTS_SEED=42
//!     TREESEARCH_PLAYER_HUMAN_FIRST=false
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_PATH_ENV, CONFIG_SEARCH_PATHS,
};
pub use structs::*;

#[cfg(test)]
mod tests;
