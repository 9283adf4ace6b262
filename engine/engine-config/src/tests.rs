//! Tests for the configuration module.

use super::*;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.mcts.num_iterations, 5000);
    assert!(config.mcts.seed.is_none());
    assert!(config.mcts.max_nodes.is_none());
    assert!(config.player.human_first);
    assert!(!config.player.show_statistics);
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
log_level = "debug"

[mcts]
num_iterations = 20000
seed = 7
max_nodes = 100000

[player]
human_first = false
show_statistics = true
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.log_level, "debug");
    assert_eq!(config.mcts.num_iterations, 20000);
    assert_eq!(config.mcts.seed, Some(7));
    assert_eq!(config.mcts.max_nodes, Some(100000));
    assert!(!config.player.human_first);
    assert!(config.player.show_statistics);
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[mcts]
num_iterations = 100
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.mcts.num_iterations, 100);
    assert!(config.mcts.seed.is_none()); // Default
    assert_eq!(config.common.log_level, "info"); // Default
    assert!(config.player.human_first); // Default
}

#[test]
fn test_load_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[mcts]\nnum_iterations = 321\nseed = 9").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.mcts.num_iterations, 321);
    assert_eq!(config.mcts.seed, Some(9));
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[mcts\nnum_iterations = ").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.mcts.num_iterations, 5000);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_from_path(&dir.path().join("absent.toml"));
    assert_eq!(config.common.log_level, "info");
}

#[test]
fn test_treesearch_env_overrides() {
    std::env::set_var("TREESEARCH_MCTS_MAX_NODES", "4096");
    std::env::set_var("TREESEARCH_PLAYER_SHOW_STATISTICS", "true");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.mcts.max_nodes, Some(4096));
    assert!(config.player.show_statistics);

    std::env::remove_var("TREESEARCH_MCTS_MAX_NODES");
    std::env::remove_var("TREESEARCH_PLAYER_SHOW_STATISTICS");
}

#[test]
fn test_unparseable_env_override_is_ignored() {
    std::env::set_var("TREESEARCH_PLAYER_HUMAN_FIRST", "sometimes");

    let config = apply_env_overrides(CentralConfig::default());
    assert!(config.player.human_first);

    std::env::remove_var("TREESEARCH_PLAYER_HUMAN_FIRST");
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(config.common.log_level, cloned.common.log_level);
    assert_eq!(config.mcts.num_iterations, cloned.mcts.num_iterations);
}

#[test]
fn test_config_path_env_takes_precedence() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[mcts]\nnum_iterations = 77").unwrap();

    std::env::set_var(CONFIG_PATH_ENV, file.path());
    let config = load_config();
    std::env::remove_var(CONFIG_PATH_ENV);

    assert_eq!(config.mcts.num_iterations, 77);
}
