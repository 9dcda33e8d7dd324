//! Sliding puzzle integration tests.

use coupon_arcade::core::{PuzzleConfig, SeededRandom};
use coupon_arcade::puzzle::{valid_moves, Board, PuzzleEngine};
use proptest::prelude::*;

fn is_permutation(tiles: &[usize]) -> bool {
    let mut sorted = tiles.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, &t)| i == t)
}

fn sorted(mut moves: Vec<usize>) -> Vec<usize> {
    moves.sort_unstable();
    moves
}

// =============================================================================
// Move Set Tests
// =============================================================================

#[test]
fn test_corner_center_and_opposite_corner() {
    assert_eq!(sorted(valid_moves(0, 3).to_vec()), vec![1, 3]);
    assert_eq!(sorted(valid_moves(4, 3).to_vec()), vec![1, 3, 5, 7]);
    assert_eq!(sorted(valid_moves(8, 3).to_vec()), vec![5, 7]);
}

#[test]
fn test_every_cell_has_two_to_four_moves() {
    for size in 2..=6 {
        for index in 0..size * size {
            let moves = valid_moves(index, size);
            assert!((2..=4).contains(&moves.len()), "{} on {}x{}", index, size, size);
        }
    }
}

#[test]
fn test_moves_are_symmetric() {
    let size = 4;
    for a in 0..size * size {
        for &b in valid_moves(a, size).iter() {
            assert!(valid_moves(b, size).contains(&a));
        }
    }
}

// =============================================================================
// Shuffle Tests
// =============================================================================

#[test]
fn test_shuffle_three_by_three() {
    let engine = PuzzleEngine::default();
    let solved = engine.create_solved_state(3);
    let mut rng = SeededRandom::new(42);

    let shuffled = engine.shuffle(&solved, &mut rng);

    assert!(is_permutation(shuffled.tiles()));
    assert!(shuffled.tiles().contains(&8));
    assert!(!shuffled.is_solved());
    assert!(shuffled.is_solvable());
}

#[test]
fn test_size_two_shuffle_is_never_solved() {
    let engine = PuzzleEngine::default();
    let solved = engine.create_solved_state(2);

    for seed in 0..50 {
        let shuffled = engine.shuffle(&solved, &mut SeededRandom::new(seed));
        assert!(!shuffled.is_solved());
        assert!(shuffled.is_solvable());
    }
}

#[test]
fn test_repeated_shuffles_stay_valid() {
    let engine = PuzzleEngine::default();
    let mut rng = SeededRandom::new(5);
    let mut board = engine.create_solved_state(4);

    for _ in 0..10 {
        board = engine.shuffle(&board, &mut rng);
        assert!(is_permutation(board.tiles()));
        assert!(board.is_solvable());
    }
}

#[test]
fn test_replaying_trace_reproduces_board() {
    let engine = PuzzleEngine::default();
    let solved = engine.create_solved_state(4);

    let (shuffled, trace) = engine.shuffle_traced(&solved, &mut SeededRandom::new(11));

    let mut replay = solved.clone();
    for &target in &trace[1..] {
        assert!(replay.swap_empty(target));
    }
    assert_eq!(replay, shuffled);
}

#[test]
fn test_walking_the_trace_backwards_solves() {
    let engine = PuzzleEngine::default();
    let solved = engine.create_solved_state(3);

    let (mut board, trace) = engine.shuffle_traced(&solved, &mut SeededRandom::new(8));

    for &target in trace.iter().rev().skip(1) {
        assert!(board.slide(target));
    }
    assert!(board.is_solved());
}

#[test]
fn test_custom_depth() {
    let engine = PuzzleEngine::new(PuzzleConfig::default().with_moves_per_size_step(3));
    let solved = engine.create_solved_state(4);

    let (_, trace) = engine.shuffle_traced(&solved, &mut SeededRandom::new(2));

    assert_eq!(trace.len(), 7);
}

#[test]
fn test_playing_a_shuffled_board_keeps_permutation() {
    let engine = PuzzleEngine::default();
    let mut board = engine.shuffle(&engine.create_solved_state(3), &mut SeededRandom::new(3));

    // Try clicking every cell; only neighbors of the gap move
    for index in 0..9 {
        let expected = valid_moves(board.empty_index(), 3).contains(&index);
        assert_eq!(board.slide(index), expected);
        assert!(is_permutation(board.tiles()));
    }
}

#[test]
fn test_unsolvable_board_detected() {
    let board = Board::from_tiles(3, vec![0, 1, 2, 3, 4, 5, 7, 6, 8]).unwrap();
    assert!(!board.is_solvable());
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn prop_shuffle_is_permutation(size in 2usize..7, seed in any::<u64>()) {
        let engine = PuzzleEngine::default();
        let shuffled = engine.shuffle(&engine.create_solved_state(size), &mut SeededRandom::new(seed));

        prop_assert_eq!(shuffled.tiles().len(), size * size);
        prop_assert!(is_permutation(shuffled.tiles()));
    }

    #[test]
    fn prop_shuffle_only_takes_legal_steps(size in 3usize..6, seed in any::<u64>()) {
        let engine = PuzzleEngine::default();
        let (shuffled, trace) =
            engine.shuffle_traced(&engine.create_solved_state(size), &mut SeededRandom::new(seed));

        prop_assert_eq!(trace[0], size * size - 1);
        for pair in trace.windows(2) {
            prop_assert!(pair[1] < size * size);
            prop_assert!(valid_moves(pair[0], size).contains(&pair[1]));
        }
        prop_assert_eq!(*trace.last().unwrap(), shuffled.empty_index());
        prop_assert!(shuffled.is_solvable());
    }
}
