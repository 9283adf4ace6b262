use super::*;
use mcts::Game;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn test_initial_state() {
    let state = State::new();
    assert_eq!(state.board, [0; 9]);
    assert_eq!(state.current_player, 0);
    assert_eq!(state.winner, 0);
    assert!(!state.is_done());
    assert!(state.outcome().is_none());
}

#[test]
fn test_legal_moves() {
    let state = State::new();
    let legal = state.legal_moves();
    assert_eq!(legal, (0..9).collect::<Vec<_>>());

    // After one move
    let state = state.make_move(4); // Center
    let legal = state.legal_moves();
    assert_eq!(legal.len(), 8);
    assert!(!legal.contains(&4));
}

#[test]
fn test_make_move() {
    let state = State::new();
    let new_state = state.make_move(4); // X places in center

    assert_eq!(new_state.board[4], 1);
    assert_eq!(new_state.current_player, 1); // Now O's turn
    assert!(!new_state.is_done());
}

#[test]
fn test_invalid_move() {
    let state = State::new();
    let state_with_move = state.make_move(4);

    // Try to place in same position
    let invalid_state = state_with_move.make_move(4);
    assert_eq!(invalid_state, state_with_move); // Should be unchanged
}

#[test]
fn test_winning_game() {
    let mut state = State::new();

    // X wins with top row
    state = state.make_move(0); // X
    state = state.make_move(3); // O
    state = state.make_move(1); // X
    state = state.make_move(4); // O
    state = state.make_move(2); // X wins

    assert_eq!(state.outcome(), Some(Outcome::Win(0)));
    assert!(state.is_done());
    assert!(state.legal_moves().is_empty());
}

#[test]
fn test_draw_game() {
    // Board: X O X / O X X / O X O
    let state = State::from_board([1, 2, 1, 2, 1, 1, 2, 1, 2]).unwrap();

    assert_eq!(state.outcome(), Some(Outcome::Draw));
    assert!(state.is_done());
}

#[test]
fn test_all_winning_lines() {
    let lines = [
        [0, 1, 2],
        [3, 4, 5],
        [6, 7, 8],
        [0, 3, 6],
        [1, 4, 7],
        [2, 5, 8],
        [0, 4, 8],
        [2, 4, 6],
    ];

    for line in lines {
        for piece in [1u8, 2] {
            let mut board = [0u8; 9];
            for &cell in &line {
                board[cell] = piece;
            }
            assert_eq!(
                State::check_winner(&board),
                piece,
                "line {:?} for piece {}",
                line,
                piece
            );
        }
    }
}

#[test]
fn test_from_board() {
    let state = State::from_board([1, 0, 0, 0, 2, 0, 0, 0, 1]).unwrap();
    assert_eq!(state.current_player(), 1);
    assert!(!state.is_done());

    let state = State::from_board([1, 0, 0, 0, 2, 0, 0, 0, 0]).unwrap();
    assert_eq!(state.current_player(), 0);
}

#[test]
fn test_from_board_rejects_bad_counts() {
    assert!(matches!(
        State::from_board([2, 0, 0, 0, 0, 0, 0, 0, 0]),
        Err(TicTacToeError::InvalidBoard(_))
    ));
    assert!(matches!(
        State::from_board([1, 1, 0, 0, 0, 0, 0, 0, 0]),
        Err(TicTacToeError::InvalidBoard(_))
    ));
    assert!(matches!(
        State::from_board([7, 0, 0, 0, 0, 0, 0, 0, 0]),
        Err(TicTacToeError::InvalidBoard(_))
    ));
}

#[test]
fn test_display() {
    let state = State::new().make_move(0).make_move(4);
    assert_eq!(state.to_string(), "X . .\n. O .\n. . .\n");
    assert_eq!(Action::Place(5).to_string(), "1 2");
}

// =========================================================================
// Move parsing
// =========================================================================

#[test]
fn test_parse_move_row_col() {
    let state = State::new();
    assert_eq!(parse_move("1 2", &state), Ok(Action::Place(5)));
    assert_eq!(parse_move("  0   0 \n", &state), Ok(Action::Place(0)));
}

#[test]
fn test_parse_move_cell_number() {
    let state = State::new();
    assert_eq!(parse_move("8", &state), Ok(Action::Place(8)));
}

#[test]
fn test_parse_move_rejects_garbage() {
    let state = State::new();
    for input in ["", "a b", "1 2 3", "x", "-1 0"] {
        assert!(
            matches!(parse_move(input, &state), Err(TicTacToeError::Parse(_))),
            "{input:?} should not parse"
        );
    }
}

#[test]
fn test_parse_move_out_of_range() {
    let state = State::new();
    assert!(matches!(
        parse_move("3 0", &state),
        Err(TicTacToeError::OutOfRange(_))
    ));
    assert!(matches!(
        parse_move("9", &state),
        Err(TicTacToeError::OutOfRange(_))
    ));
}

#[test]
fn test_parse_move_occupied() {
    let state = State::new().make_move(4);
    assert_eq!(
        parse_move("1 1", &state),
        Err(TicTacToeError::Occupied { row: 1, col: 1 })
    );
}

#[test]
fn test_parse_move_after_game_over() {
    let state = State::from_board([1, 1, 1, 2, 2, 0, 0, 0, 0]).unwrap();
    assert_eq!(parse_move("2 2", &state), Err(TicTacToeError::GameOver));
}

// =========================================================================
// Game callbacks
// =========================================================================

#[test]
fn test_game_callbacks() {
    let game = TicTacToe::new();
    let state = State::new();

    assert_eq!(game.actions(&state).len(), 9);
    assert_eq!(game.whose_turn(&state), 0);
    assert!(!game.is_terminal(&state));

    let next = game.apply_action(&state, &Action::Place(4));
    assert_eq!(game.whose_turn(&next), 1);
    assert!(!game.actions(&next).contains(&Action::Place(4)));
    // apply_action leaves its input alone
    assert_eq!(state, State::new());
}

#[test]
fn test_rewards() {
    let game = TicTacToe::new();

    let x_wins = State::from_board([1, 1, 1, 2, 2, 0, 0, 0, 0]).unwrap();
    assert_eq!(game.assign_rewards(&x_wins), vec![1.0, -1.0]);

    let o_wins = State::from_board([1, 1, 0, 2, 2, 2, 1, 0, 0]).unwrap();
    assert_eq!(game.assign_rewards(&o_wins), vec![-1.0, 1.0]);

    let draw = State::from_board([1, 2, 1, 2, 1, 1, 2, 1, 2]).unwrap();
    assert_eq!(game.assign_rewards(&draw), vec![0.0, 0.0]);
}

#[test]
fn test_no_actions_after_game_over() {
    let game = TicTacToe::new();
    let state = State::from_board([1, 1, 1, 2, 2, 0, 0, 0, 0]).unwrap();

    assert!(game.is_terminal(&state));
    assert!(game.actions(&state).is_empty());
}

// =========================================================================
// Fuzz-style tests with random seeds
// =========================================================================

/// Play many random games through the default policy and verify invariants hold
#[test]
fn test_random_games_invariants() {
    let game = TicTacToe::new();

    for seed in 0..50 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut state = State::new();
        let mut move_count = 0;

        while !game.is_terminal(&state) {
            let actions = game.actions(&state);
            assert!(
                !actions.is_empty(),
                "Non-terminal game must have actions (seed={}, moves={})",
                seed,
                move_count
            );

            let prev_player = game.whose_turn(&state);
            state = game.default_policy(&state, &actions, &mut rng);
            move_count += 1;

            if !state.is_done() {
                assert_ne!(
                    game.whose_turn(&state),
                    prev_player,
                    "Player should switch after move (seed={})",
                    seed
                );
            }
        }

        assert!(move_count <= 9, "Game should finish within 9 moves (seed={})", seed);
        let rewards = game.assign_rewards(&state);
        assert_eq!(rewards.len(), 2);
        assert_eq!(rewards[0], -rewards[1], "Rewards are zero-sum (seed={})", seed);
    }
}
