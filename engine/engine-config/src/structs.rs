//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_num_iterations() -> u32 {
    defaults::num_iterations()
}
fn d_seed() -> Option<u64> {
    defaults::seed()
}
fn d_max_nodes() -> Option<usize> {
    defaults::max_nodes()
}
fn d_human_first() -> bool {
    defaults::human_first()
}
fn d_show_statistics() -> bool {
    defaults::show_statistics()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// MCTS (Monte Carlo Tree Search) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_num_iterations")]
    pub num_iterations: u32,
    /// Fixed seed for the search's random source (None = OS entropy)
    #[serde(default = "d_seed")]
    pub seed: Option<u64>,
    /// Cap on the number of tree nodes (None = unbounded)
    #[serde(default = "d_max_nodes")]
    pub max_nodes: Option<usize>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_iterations: defaults::num_iterations(),
            seed: defaults::seed(),
            max_nodes: defaults::max_nodes(),
        }
    }
}

/// Interactive player configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlayerConfig {
    #[serde(default = "d_human_first")]
    pub human_first: bool,
    #[serde(default = "d_show_statistics")]
    pub show_statistics: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            human_first: defaults::human_first(),
            show_statistics: defaults::show_statistics(),
        }
    }
}
