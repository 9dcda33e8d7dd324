//! Sliding-tile puzzle.
//!
//! - `Board`: permutation of `0..size*size`, highest value is the gap
//! - `PuzzleEngine`: solved boards, legal moves, random-walk shuffles
//!
//! Pure logic. No I/O, no shared state.

pub mod board;
pub mod engine;

pub use board::Board;
pub use engine::{valid_moves, Moves, PuzzleEngine};
