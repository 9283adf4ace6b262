//! MCTS configuration parameters.

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of iterations run by `MctsSearch::run` and `MctsSearch::search`.
    pub num_iterations: u32,

    /// Seed for the session's random source.
    /// None seeds from OS entropy; set it for reproducible searches.
    pub seed: Option<u64>,

    /// Upper bound on the number of tree nodes.
    /// Growing past it fails the iteration instead of exhausting memory.
    pub max_nodes: Option<usize>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_iterations: 5000,
            seed: None,
            max_nodes: None,
        }
    }
}

impl MctsConfig {
    /// Create config for testing (few iterations, fixed seed).
    pub fn for_testing() -> Self {
        Self {
            num_iterations: 200,
            seed: Some(42),
            max_nodes: None,
        }
    }

    /// Builder method to set number of iterations.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.num_iterations = n;
        self
    }

    /// Builder method to set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method to cap the tree size.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_iterations, 5000);
        assert!(config.seed.is_none());
        assert!(config.max_nodes.is_none());
    }

    #[test]
    fn test_testing_config_is_seeded() {
        let config = MctsConfig::for_testing();
        assert_eq!(config.seed, Some(42));
        assert!(config.num_iterations < MctsConfig::default().num_iterations);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_iterations(100)
            .with_seed(7)
            .with_max_nodes(1_000);

        assert_eq!(config.num_iterations, 100);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_nodes, Some(1_000));
    }
}
