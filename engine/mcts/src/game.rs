//! Game trait: the callbacks the search needs from a game.
//!
//! The search never inspects states or actions itself. Everything it knows
//! about a game comes through this trait, bound once when a session is built.

use std::fmt::Debug;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

/// Exploration constant used by [`ucb1`] (sqrt(2)).
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Callbacks for a perfect-information game with rewards at termination.
///
/// # Type Parameters
///
/// * `State` - Game state. Treated as an opaque value; cloned when playouts start.
/// * `Action` - Action type. Compared with `==` when the root is advanced.
///
/// # Example
///
/// ```rust
/// use mcts::Game;
///
/// /// Players alternately add 1 or 2; whoever reaches 5 wins.
/// #[derive(Debug)]
/// struct RaceToFive;
///
/// impl Game for RaceToFive {
///     type State = (u8, usize);
///     type Action = u8;
///
///     fn actions(&self, state: &Self::State) -> Vec<u8> {
///         if self.is_terminal(state) { Vec::new() } else { vec![1, 2] }
///     }
///
///     fn apply_action(&self, state: &Self::State, action: &u8) -> Self::State {
///         ((state.0 + action).min(5), 1 - state.1)
///     }
///
///     fn is_terminal(&self, state: &Self::State) -> bool {
///         state.0 >= 5
///     }
///
///     fn assign_rewards(&self, state: &Self::State) -> Vec<f64> {
///         // The player who just moved reached 5.
///         let winner = 1 - state.1;
///         (0..2).map(|p| if p == winner { 1.0 } else { -1.0 }).collect()
///     }
///
///     fn whose_turn(&self, state: &Self::State) -> usize {
///         state.1
///     }
/// }
///
/// let game = RaceToFive;
/// assert_eq!(game.actions(&(0, 0)), vec![1, 2]);
/// assert!(game.is_terminal(&game.apply_action(&(4, 0), &1)));
/// ```
pub trait Game {
    type State: Clone + Debug;

    type Action: Clone + PartialEq + Debug;

    /// Legal actions from `state`. May be empty only when `state` is terminal.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Deterministic transition. Must not change `state`.
    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// One step of the playout policy.
    ///
    /// Called only with a non-empty `actions` slice (the legal actions of `state`)
    /// and must consume exactly one action. The default picks uniformly at random.
    ///
    /// The search never passes an empty slice: a non-terminal state without
    /// actions is reported as a contract violation before the policy runs.
    /// Given one anyway, the default returns `state` unchanged.
    fn default_policy(
        &self,
        state: &Self::State,
        actions: &[Self::Action],
        rng: &mut ChaCha20Rng,
    ) -> Self::State {
        debug_assert!(!actions.is_empty(), "default_policy called without actions");
        match actions.choose(rng) {
            Some(action) => self.apply_action(state, action),
            None => state.clone(),
        }
    }

    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Reward per player id for a terminal state. Every entry must satisfy |r| <= 1.
    fn assign_rewards(&self, state: &Self::State) -> Vec<f64>;

    /// Score used by selection; higher is better.
    ///
    /// Never called with `edge_visits == 0`: untried edges are handled by expansion.
    fn selection_score(&self, total_reward: f64, edge_visits: u32, parent_visits: u32) -> f64 {
        ucb1(total_reward, edge_visits, parent_visits)
    }

    /// Id of the player about to move in `state`.
    fn whose_turn(&self, state: &Self::State) -> usize;
}

/// UCB1 with the standard exploration constant.
///
/// UCB1 = W / n + sqrt(2 * ln(N) / n)
#[inline]
pub fn ucb1(total_reward: f64, edge_visits: u32, parent_visits: u32) -> f64 {
    ucb1_with_exploration(total_reward, edge_visits, parent_visits, DEFAULT_EXPLORATION)
}

/// UCB1 with an explicit exploration constant `c`.
///
/// UCB1 = W / n + c * sqrt(ln(N) / n)
#[inline]
pub fn ucb1_with_exploration(
    total_reward: f64,
    edge_visits: u32,
    parent_visits: u32,
    c: f64,
) -> f64 {
    let n = edge_visits as f64;
    let mean = total_reward / n;
    let exploration = c * ((parent_visits as f64).ln() / n).sqrt();
    mean + exploration
}
