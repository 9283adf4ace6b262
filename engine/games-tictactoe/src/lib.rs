//! TicTacToe game implementation for the MCTS engine
//!
//! This crate provides a complete reference implementation of TicTacToe
//! demonstrating how to implement the [`mcts::Game`] trait.
//!
//! # Usage
//!
//! ```rust
//! use games_tictactoe::{parse_move, State, TicTacToe};
//! use mcts::{MctsConfig, MctsSearch};
//!
//! let config = MctsConfig::default().with_iterations(500).with_seed(42);
//! let mut search = MctsSearch::new(TicTacToe, State::new(), 2, config);
//! search.initialize().unwrap();
//!
//! // Human takes the center, engine answers
//! let center = parse_move("1 1", search.root_state()).unwrap();
//! search.advance_root(&center).unwrap();
//! search.run().unwrap();
//! let reply = search.advance_to_best().unwrap();
//! assert_ne!(reply, center);
//! ```

use std::fmt;

use thiserror::Error;

/// Errors from reading a move or building a board.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TicTacToeError {
    #[error("Could not read a move from {0:?}: expected \"row col\" or a cell number 0-8")]
    Parse(String),

    #[error("Cell out of range: {0}")]
    OutOfRange(String),

    #[error("Cell ({row}, {col}) is already taken")]
    Occupied { row: u8, col: u8 },

    #[error("The game is already over")]
    GameOver,

    #[error("Invalid board: {0}")]
    InvalidBoard(String),
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The given player (0 or 1) completed a line
    Win(usize),
    Draw,
}

/// TicTacToe game state
///
/// Represents the complete state of a TicTacToe game including the board,
/// player to move, and winner information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    /// Board representation: 0=empty, 1=player 0 (X), 2=player 1 (O)
    board: [u8; 9],
    /// Player to move: 0 or 1
    current_player: u8,
    /// Winner: 0=none/ongoing, 1=player 0, 2=player 1, 3=draw
    winner: u8,
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [0; 9],
            current_player: 0, // X goes first
            winner: 0,
        }
    }

    /// Build a state from raw cells (0=empty, 1=X, 2=O), row-major.
    ///
    /// The player to move follows from the piece counts, X moving first.
    pub fn from_board(board: [u8; 9]) -> Result<Self, TicTacToeError> {
        if let Some(cell) = board.iter().find(|&&cell| cell > 2) {
            return Err(TicTacToeError::InvalidBoard(format!(
                "cell value {cell} (expected 0, 1 or 2)"
            )));
        }

        let xs = board.iter().filter(|&&cell| cell == 1).count();
        let os = board.iter().filter(|&&cell| cell == 2).count();
        let current_player = match xs.checked_sub(os) {
            Some(0) => 0,
            Some(1) => 1,
            _ => {
                return Err(TicTacToeError::InvalidBoard(format!(
                    "{xs} X pieces against {os} O pieces"
                )))
            }
        };

        Ok(Self {
            board,
            current_player,
            winner: Self::check_winner(&board),
        })
    }

    /// Raw cells, row-major
    pub fn board(&self) -> &[u8; 9] {
        &self.board
    }

    /// Player to move (0 or 1)
    pub fn current_player(&self) -> usize {
        self.current_player as usize
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner != 0
    }

    /// Result of a finished game, None while it is still going
    pub fn outcome(&self) -> Option<Outcome> {
        match self.winner {
            1 => Some(Outcome::Win(0)),
            2 => Some(Outcome::Win(1)),
            3 => Some(Outcome::Draw),
            _ => None,
        }
    }

    /// Get legal moves (empty positions)
    pub fn legal_moves(&self) -> Vec<u8> {
        if self.is_done() {
            return Vec::new();
        }

        (0..9u8)
            .filter(|&pos| self.board[pos as usize] == 0)
            .collect()
    }

    /// Make a move and return the new state
    pub fn make_move(&self, position: u8) -> State {
        if self.is_done() || position >= 9 || self.board[position as usize] != 0 {
            return *self; // Invalid move, return unchanged state
        }

        let mut new_state = *self;
        new_state.board[position as usize] = self.current_player + 1;

        // Check for winner
        new_state.winner = Self::check_winner(&new_state.board);

        // Switch player if game not over
        if new_state.winner == 0 {
            new_state.current_player = 1 - self.current_player;
        }

        new_state
    }

    /// Check for winner on the board
    fn check_winner(board: &[u8; 9]) -> u8 {
        // Winning positions (rows, columns, diagonals)
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8], // rows
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8], // columns
            [0, 4, 8],
            [2, 4, 6], // diagonals
        ];

        for line in &LINES {
            let [a, b, c] = *line;
            if board[a] != 0 && board[a] == board[b] && board[b] == board[c] {
                return board[a]; // Return the winning player
            }
        }

        // Check for draw (board full but no winner)
        if board.iter().all(|&cell| cell != 0) {
            return 3; // Draw
        }

        0 // Game ongoing
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.chunks(3) {
            let cells: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    1 => "X",
                    2 => "O",
                    _ => ".",
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// TicTacToe action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Place a piece at the given position (0-8, row-major)
    Place(u8),
}

impl Action {
    /// Get the position for this action
    pub fn position(&self) -> u8 {
        match self {
            Action::Place(pos) => *pos,
        }
    }

    /// (row, col) of the position
    pub fn coords(&self) -> (u8, u8) {
        (self.position() / 3, self.position() % 3)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, col) = self.coords();
        write!(f, "{row} {col}")
    }
}

/// Read a move as `"row col"` (each 0-2) or a single cell number 0-8.
///
/// The move must be legal in `state`.
pub fn parse_move(input: &str, state: &State) -> Result<Action, TicTacToeError> {
    let parse = |token: &str| {
        token
            .parse::<u8>()
            .map_err(|_| TicTacToeError::Parse(input.trim().to_string()))
    };

    let tokens: Vec<&str> = input.split_whitespace().collect();
    let position = match tokens.as_slice() {
        &[cell] => {
            let cell = parse(cell)?;
            if cell >= 9 {
                return Err(TicTacToeError::OutOfRange(format!("cell {cell}")));
            }
            cell
        }
        &[row, col] => {
            let (row, col) = (parse(row)?, parse(col)?);
            if row >= 3 || col >= 3 {
                return Err(TicTacToeError::OutOfRange(format!("row {row}, col {col}")));
            }
            row * 3 + col
        }
        _ => return Err(TicTacToeError::Parse(input.trim().to_string())),
    };

    if state.is_done() {
        return Err(TicTacToeError::GameOver);
    }
    if state.board[position as usize] != 0 {
        let (row, col) = Action::Place(position).coords();
        return Err(TicTacToeError::Occupied { row, col });
    }

    Ok(Action::Place(position))
}

/// TicTacToe game implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TicTacToe {
    /// Create a new TicTacToe game
    pub fn new() -> Self {
        Self
    }
}

impl mcts::Game for TicTacToe {
    type State = State;
    type Action = Action;

    fn actions(&self, state: &State) -> Vec<Action> {
        state.legal_moves().into_iter().map(Action::Place).collect()
    }

    fn apply_action(&self, state: &State, action: &Action) -> State {
        state.make_move(action.position())
    }

    fn is_terminal(&self, state: &State) -> bool {
        state.is_done()
    }

    /// Winner +1, loser -1, draw 0 for both
    fn assign_rewards(&self, state: &State) -> Vec<f64> {
        match state.outcome() {
            Some(Outcome::Win(0)) => vec![1.0, -1.0],
            Some(Outcome::Win(_)) => vec![-1.0, 1.0],
            Some(Outcome::Draw) | None => vec![0.0, 0.0],
        }
    }

    fn whose_turn(&self, state: &State) -> usize {
        state.current_player()
    }
}

#[cfg(test)]
mod tests;
