//! Monte Carlo Tree Search (MCTS) with UCB1 selection and random playouts.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! game implementing the [`Game`] trait.
//!
//! # Overview
//!
//! MCTS is a search algorithm that builds a search tree by running iterations.
//! Each iteration consists of four phases:
//!
//! 1. **Selection**: Descend through fully expanded nodes using the game's
//!    selection score (UCB1 by default)
//! 2. **Expansion**: Materialize one untried child, chosen uniformly at random
//! 3. **Simulation**: Play the default policy from the new child to a terminal
//!    state, without touching the tree
//! 4. **Backpropagation**: Credit every link on the path with the reward of the
//!    player who chose it
//!
//! Statistics live on links (parent to child edges), so each one is naturally
//! seen from the perspective of the player choosing among them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcts::{MctsConfig, MctsSearch};
//! use games_tictactoe::{State, TicTacToe};
//!
//! let config = MctsConfig::default().with_seed(42);
//! let mut search = MctsSearch::new(TicTacToe, State::new(), 2, config);
//! search.initialize()?;
//!
//! // Think, move, and keep the subtree for the next turn
//! search.run()?;
//! let action = search.advance_to_best()?;
//! println!("Engine plays {action}");
//!
//! // Opponent replies; statistics below their move survive
//! let reply = games_tictactoe::parse_move("0 0", search.root_state())?;
//! search.advance_root(&reply)?;
//! search.run()?;
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_iterations`: Iterations per call to `run` (default: 5000)
//! - `seed`: Seed for the session's random source (default: OS entropy)
//! - `max_nodes`: Optional cap on the size of the tree
//!
//! # Architecture
//!
//! ```text
//! +--------------------------------------------------+
//! |                    MctsSearch                    |
//! |  +-------------+  +-----------+  +------------+  |
//! |  |  MctsTree   |  |   Game    |  | ChaCha20Rng|  |
//! |  |  (arena)    |  | callbacks |  |            |  |
//! |  +-------------+  +-----------+  +------------+  |
//! |                                                  |
//! |   select -> expand -> simulate -> backpropagate  |
//! +--------------------------------------------------+
//! ```

pub mod config;
pub mod game;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use game::{ucb1, ucb1_with_exploration, Game, DEFAULT_EXPLORATION};
pub use node::{Link, MctsNode, NodeId};
pub use search::{run_mcts, ActionStats, MctsSearch, SearchError, SearchResult};
pub use tree::{MctsTree, TreeError, TreeStats};
