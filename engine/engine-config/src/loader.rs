//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "TREESEARCH_CONFIG";

/// Files tried, in order, when `TREESEARCH_CONFIG` is unset or points nowhere
pub const CONFIG_SEARCH_PATHS: &[&str] = &["config.toml", "../config.toml"];

/// Load the central configuration.
///
/// `TREESEARCH_CONFIG` wins when it names an existing file; otherwise the
/// first of [`CONFIG_SEARCH_PATHS`] that exists is used, and the embedded
/// defaults when none does. Environment overrides are applied last.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_PATH_ENV, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load `path`, falling back to the built-in defaults when the file cannot be
/// read or parsed.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Overwrite `$config.$section.$field` from `$key` when it is set.
/// Values that fail to parse are logged and ignored.
macro_rules! env_override {
    // String
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // FromStr
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
    // Option<FromStr>
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = Some(v),
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
}

/// Apply `TREESEARCH_<SECTION>_<KEY>` overrides on top of `config`.
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "TREESEARCH_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(
        config,
        mcts.num_iterations,
        "TREESEARCH_MCTS_NUM_ITERATIONS",
        parse
    );
    env_override!(config, mcts.seed, "TREESEARCH_MCTS_SEED", optional_parse);
    env_override!(
        config,
        mcts.max_nodes,
        "TREESEARCH_MCTS_MAX_NODES",
        optional_parse
    );

    // Player
    env_override!(
        config,
        player.human_first,
        "TREESEARCH_PLAYER_HUMAN_FIRST",
        parse
    );
    env_override!(
        config,
        player.show_statistics,
        "TREESEARCH_PLAYER_SHOW_STATISTICS",
        parse
    );

    config
}
