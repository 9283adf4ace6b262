//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Walk fully expanded nodes using the game's selection score
//! 2. Expansion: Materialize one untried child, chosen uniformly at random
//! 3. Simulation: Play the default policy to a terminal state
//! 4. Backpropagation: Update link statistics along the path to the root
//!
//! A session outlives a single decision: after a move is chosen the root is
//! advanced to the matching child and the statistics below it are reused.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::game::Game;
use crate::node::NodeId;
use crate::tree::{MctsTree, TreeError};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search not initialized: call initialize() first")]
    NotInitialized,

    #[error("Search already initialized")]
    AlreadyInitialized,

    #[error("Root state is terminal")]
    TerminalRoot,

    #[error("No root action has been tried yet")]
    NoTriedActions,

    #[error("Action not available at the root: {0}")]
    IllegalAction(String),

    #[error("Reward vector too short: expected at least {expected} entries, got {actual}")]
    RewardVectorTooShort { expected: usize, actual: usize },

    #[error("Reward for player {player} out of range [-1, 1]: {value}")]
    RewardOutOfRange { player: usize, value: f64 },

    #[error("Game contract violation: {0}")]
    ContractViolation(String),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
}

/// Statistics of one root action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionStats<A> {
    pub action: A,

    /// Times the root link was traversed
    pub visits: u32,

    /// Reward summed from the root player's point of view
    pub total_reward: f64,

    /// total_reward / visits, None if never tried
    pub mean_reward: Option<f64>,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    /// Best action to take
    pub action: A,

    /// Mean reward of `action` for the player to move at the root
    pub value: f64,

    /// Iterations accumulated at the root (including reused ones)
    pub iterations: u32,
}

/// MCTS search session.
///
/// Owns the game callbacks, the whole node arena and the random source.
pub struct MctsSearch<G: Game> {
    game: G,
    tree: MctsTree<G::State, G::Action>,
    config: MctsConfig,
    num_players: usize,
    rng: ChaCha20Rng,
    initialized: bool,
}

impl<G: Game> MctsSearch<G> {
    /// Create a new session rooted at `initial_state`.
    ///
    /// The root's actions are not computed until [`initialize`](Self::initialize).
    pub fn new(game: G, initial_state: G::State, num_players: usize, config: MctsConfig) -> Self {
        let is_terminal = game.is_terminal(&initial_state);
        let tree = MctsTree::new(initial_state, is_terminal).with_max_nodes(config.max_nodes);
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };

        Self {
            game,
            tree,
            config,
            num_players,
            rng,
            initialized: false,
        }
    }

    /// Replace the random source.
    pub fn with_rng(mut self, rng: ChaCha20Rng) -> Self {
        self.rng = rng;
        self
    }

    /// Compute the root's actions and links. Must be called exactly once.
    pub fn initialize(&mut self) -> Result<(), SearchError> {
        if self.initialized {
            return Err(SearchError::AlreadyInitialized);
        }

        let root_id = self.tree.root();
        let root = self.tree.get(root_id);
        let actions = self.game.actions(&root.state);
        check_actions(root.is_terminal, actions.len())?;
        self.tree.populate_links(root_id, actions)?;
        self.initialized = true;

        debug!(
            actions = self.tree.get(root_id).actions.len(),
            terminal = self.tree.get(root_id).is_terminal,
            "MCTS root initialized"
        );
        Ok(())
    }

    /// Run the configured number of iterations.
    pub fn run(&mut self) -> Result<(), SearchError> {
        self.run_iterations(self.config.num_iterations)
    }

    /// Run `n` iterations against the shared tree.
    pub fn run_iterations(&mut self, n: u32) -> Result<(), SearchError> {
        if !self.initialized {
            return Err(SearchError::NotInitialized);
        }
        if self.tree.get(self.tree.root()).is_terminal {
            return Err(SearchError::TerminalRoot);
        }

        for _ in 0..n {
            self.iterate()?;
        }

        debug!(
            iterations = n,
            nodes = self.tree.len(),
            root_visits = self.tree.get(self.tree.root()).visit_count,
            "MCTS iterations complete"
        );
        Ok(())
    }

    /// Run the configured iterations and report the best root action.
    pub fn search(&mut self) -> Result<SearchResult<G::Action>, SearchError> {
        self.run()?;

        let (index, value) = self.best_link()?;
        let root = self.tree.get(self.tree.root());
        Ok(SearchResult {
            action: root.actions[index].clone(),
            value,
            iterations: root.visit_count,
        })
    }

    /// Run a single iteration (select -> expand -> simulate -> backpropagate).
    fn iterate(&mut self) -> Result<(), SearchError> {
        let leaf_id = self.select();
        let leaf = self.tree.get(leaf_id);

        // Terminal leaf: score it directly, no expansion or playout
        let end_id = if leaf.is_terminal {
            let rewards = self.game.assign_rewards(&leaf.state);
            self.backpropagate(leaf_id, &rewards)?;
            leaf_id
        } else {
            let child_id = self.expand(leaf_id)?;
            let outcome = self
                .simulate(child_id)
                .and_then(|rewards| self.backpropagate(child_id, &rewards));
            if let Err(e) = outcome {
                self.tree.remove_last_child(child_id)?;
                return Err(e);
            }

            let parent = self.tree.get_mut(leaf_id);
            parent.fully_expanded = parent.links.iter().all(|link| !link.is_untried());
            child_id
        };

        trace!(
            leaf = leaf_id.0,
            end = end_id.0,
            nodes = self.tree.len(),
            "MCTS iteration complete"
        );
        Ok(())
    }

    /// Descend from the root through fully expanded, non-terminal nodes.
    ///
    /// At each node the link with the highest selection score wins; on ties the
    /// first link in action order is kept.
    fn select(&self) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if !node.fully_expanded || node.is_terminal {
                return current;
            }

            let mut best: Option<(usize, f64)> = None;
            for (i, link) in node.links.iter().enumerate() {
                let score =
                    self.game
                        .selection_score(link.total_reward, link.visit_count, node.visit_count);
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((i, score));
                }
            }

            match best.map(|(i, _)| node.links[i].child) {
                Some(child) if child.is_some() => current = child,
                _ => return current,
            }
        }
    }

    /// Materialize one untried child of `node_id`, chosen uniformly at random.
    /// Returns the new child's id.
    ///
    /// The parent's `fully_expanded` flag is left alone; `iterate` sets it once
    /// the iteration has been credited, and removes the child if it fails.
    fn expand(&mut self, node_id: NodeId) -> Result<NodeId, SearchError> {
        let node = self.tree.get(node_id);
        let untried = node.untried_links();
        let index = *untried.choose(&mut self.rng).ok_or_else(|| {
            SearchError::ContractViolation("non-terminal node has no untried action".into())
        })?;

        let state = self.game.apply_action(&node.state, &node.actions[index]);
        let is_terminal = self.game.is_terminal(&state);
        let actions = self.game.actions(&state);
        check_actions(is_terminal, actions.len())?;

        let child_id = self.tree.add_child(node_id, index, state, is_terminal)?;
        if let Err(e) = self.tree.populate_links(child_id, actions) {
            self.tree.remove_last_child(child_id)?;
            return Err(e.into());
        }

        Ok(child_id)
    }

    /// Play the default policy from `node_id` to a terminal state.
    /// The playout never touches the tree.
    fn simulate(&mut self, node_id: NodeId) -> Result<Vec<f64>, SearchError> {
        let mut state = self.tree.get(node_id).state.clone();

        while !self.game.is_terminal(&state) {
            let actions = self.game.actions(&state);
            if actions.is_empty() {
                return Err(SearchError::ContractViolation(
                    "actions() returned no actions at a non-terminal playout state".into(),
                ));
            }
            state = self.game.default_policy(&state, &actions, &mut self.rng);
        }

        Ok(self.game.assign_rewards(&state))
    }

    /// Walk from `node_id` up to the root, crediting each traversed link with
    /// the reward of the player who chose it.
    ///
    /// Rewards are validated before anything is written, so a failing
    /// iteration leaves the statistics untouched.
    fn backpropagate(&mut self, node_id: NodeId, rewards: &[f64]) -> Result<(), SearchError> {
        if rewards.len() < self.num_players {
            return Err(SearchError::RewardVectorTooShort {
                expected: self.num_players,
                actual: rewards.len(),
            });
        }
        if let Some((player, &value)) = rewards
            .iter()
            .enumerate()
            .find(|(_, r)| !r.is_finite() || r.abs() > 1.0)
        {
            return Err(SearchError::RewardOutOfRange { player, value });
        }

        let mut updates = Vec::new();
        let mut current = node_id;
        loop {
            let node = self.tree.get(current);
            let (parent_id, Some(action_index)) = (node.parent, node.action_index) else {
                break;
            };
            if parent_id.is_none() {
                break;
            }

            let player = self.game.whose_turn(&self.tree.get(parent_id).state);
            let reward =
                *rewards
                    .get(player)
                    .ok_or(SearchError::RewardVectorTooShort {
                        expected: player + 1,
                        actual: rewards.len(),
                    })?;

            updates.push((parent_id, action_index, reward));
            current = parent_id;
        }

        for (parent_id, action_index, reward) in updates {
            let parent = self.tree.get_mut(parent_id);
            parent.visit_count += 1;
            let link = &mut parent.links[action_index];
            link.visit_count += 1;
            link.total_reward += reward;
        }

        Ok(())
    }

    /// Root link with the highest average reward and that average.
    /// Untried links are skipped; the first link wins ties.
    fn best_link(&self) -> Result<(usize, f64), SearchError> {
        if !self.initialized {
            return Err(SearchError::NotInitialized);
        }

        let root = self.tree.get(self.tree.root());
        if root.is_terminal {
            return Err(SearchError::TerminalRoot);
        }

        let mut best: Option<(usize, f64)> = None;
        for (i, link) in root.links.iter().enumerate() {
            if let Some(mean) = link.mean_reward() {
                if best.map_or(true, |(_, best_mean)| mean > best_mean) {
                    best = Some((i, mean));
                }
            }
        }

        best.ok_or(SearchError::NoTriedActions)
    }

    /// The root action with the highest average reward (no exploration bonus).
    pub fn best_action(&self) -> Result<G::Action, SearchError> {
        let (index, _) = self.best_link()?;
        Ok(self.tree.get(self.tree.root()).actions[index].clone())
    }

    /// Per-action statistics at the root, in action order.
    pub fn root_statistics(&self) -> Vec<ActionStats<G::Action>> {
        let root = self.tree.get(self.tree.root());
        root.actions
            .iter()
            .zip(root.links.iter())
            .map(|(action, link)| ActionStats {
                action: action.clone(),
                visits: link.visit_count,
                total_reward: link.total_reward,
                mean_reward: link.mean_reward(),
            })
            .collect()
    }

    /// Re-root the tree at the child reached by `action`.
    ///
    /// Every sibling subtree is dropped; the chosen subtree keeps its
    /// statistics for the next call to `run_iterations`. An action the search
    /// never expanded is materialized first. Node ids held by the caller are
    /// invalid afterwards.
    pub fn advance_root(&mut self, action: &G::Action) -> Result<(), SearchError> {
        if !self.initialized {
            return Err(SearchError::NotInitialized);
        }

        let root_id = self.tree.root();
        let root = self.tree.get(root_id);
        let index = root
            .actions
            .iter()
            .position(|a| a == action)
            .ok_or_else(|| SearchError::IllegalAction(format!("{action:?}")))?;

        let mut child_id = root.links[index].child;
        if child_id.is_none() {
            let state = self.game.apply_action(&root.state, &root.actions[index]);
            let is_terminal = self.game.is_terminal(&state);
            let actions = self.game.actions(&state);
            check_actions(is_terminal, actions.len())?;

            child_id = self.tree.add_child(root_id, index, state, is_terminal)?;
            if let Err(e) = self.tree.populate_links(child_id, actions) {
                self.tree.remove_last_child(child_id)?;
                return Err(e.into());
            }
        }

        let discarded = self.tree.reroot(child_id)?;

        debug!(
            action = ?action,
            discarded,
            remaining = self.tree.len(),
            root_visits = self.tree.get(self.tree.root()).visit_count,
            "MCTS root advanced"
        );
        Ok(())
    }

    /// Pick the best action, advance the root to it and return it.
    pub fn advance_to_best(&mut self) -> Result<G::Action, SearchError> {
        let action = self.best_action()?;
        self.advance_root(&action)?;
        Ok(action)
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<G::State, G::Action> {
        &self.tree
    }

    /// State at the current root.
    pub fn root_state(&self) -> &G::State {
        &self.tree.get(self.tree.root()).state
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn num_players(&self) -> usize {
        self.num_players
    }
}

/// Actions may be empty exactly when the state is terminal.
fn check_actions(is_terminal: bool, num_actions: usize) -> Result<(), SearchError> {
    match (is_terminal, num_actions) {
        (true, n) if n > 0 => Err(SearchError::ContractViolation(format!(
            "actions() returned {n} actions at a terminal state"
        ))),
        (false, 0) => Err(SearchError::ContractViolation(
            "actions() returned no actions at a non-terminal state".into(),
        )),
        _ => Ok(()),
    }
}

/// Convenience function: build a session, run the configured iterations and
/// return the best action.
pub fn run_mcts<G: Game>(
    game: G,
    state: G::State,
    num_players: usize,
    config: MctsConfig,
) -> Result<SearchResult<G::Action>, SearchError> {
    let mut search = MctsSearch::new(game, state, num_players, config);
    search.initialize()?;
    search.search()
}
