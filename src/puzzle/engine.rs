//! Solved-state construction, legal moves, and random-walk shuffling.
//!
//! Shuffling never permutes tiles directly. It walks the empty cell
//! through legal moves starting from the given board, so a shuffle of a
//! solved board is always solvable and no parity check is needed.

use log::debug;
use smallvec::SmallVec;

use super::Board;
use crate::core::{PuzzleConfig, RandomSource};

/// Positions the empty cell can move to. Never more than four.
pub type Moves = SmallVec<[usize; 4]>;

/// Legal targets for the empty cell at `empty_index` on a `size` grid.
///
/// Order is up, down, left, right, skipping any that cross an edge.
///
/// ```
/// use coupon_arcade::puzzle::valid_moves;
///
/// assert_eq!(valid_moves(4, 3).as_slice(), &[1, 7, 3, 5]);
/// assert_eq!(valid_moves(0, 3).as_slice(), &[3, 1]);
/// ```
///
/// # Panics
///
/// Panics if `size < 2` or `empty_index` is outside the grid.
#[must_use]
pub fn valid_moves(empty_index: usize, size: usize) -> Moves {
    assert!(size >= 2, "Puzzle size must be at least 2");
    assert!(
        empty_index < size * size,
        "Empty index {} outside a {}x{} grid",
        empty_index,
        size,
        size
    );

    let row = empty_index / size;
    let col = empty_index % size;
    let mut moves = Moves::new();

    if row > 0 {
        moves.push(empty_index - size);
    }
    if row < size - 1 {
        moves.push(empty_index + size);
    }
    if col > 0 {
        moves.push(empty_index - 1);
    }
    if col < size - 1 {
        moves.push(empty_index + 1);
    }

    moves
}

/// Sliding puzzle engine.
///
/// Stateless apart from its configuration; every call is independent and
/// only consumes entropy from the random source it is handed.
#[derive(Clone, Debug, Default)]
pub struct PuzzleEngine {
    config: PuzzleConfig,
}

impl PuzzleEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: PuzzleConfig) -> Self {
        Self { config }
    }

    /// Get the engine configuration.
    #[must_use]
    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    /// Identity-ordered board of width `size`.
    ///
    /// # Panics
    ///
    /// Panics if `size < 2`.
    #[must_use]
    pub fn create_solved_state(&self, size: usize) -> Board {
        Board::solved(size)
    }

    /// Legal targets for the empty cell. See [`valid_moves`].
    #[must_use]
    pub fn valid_moves(&self, empty_index: usize, size: usize) -> Moves {
        valid_moves(empty_index, size)
    }

    /// Scramble `initial` with a random walk of legal moves.
    ///
    /// Performs `moves_per_size_step * (size - 2)` moves, each swapping the
    /// empty cell with a uniformly chosen neighbor. A walk of zero moves
    /// (`size = 2` by default) would hand back a solved board, so it gets
    /// one forced move instead. Longer walks are returned as they land.
    pub fn shuffle<R: RandomSource + ?Sized>(&self, initial: &Board, rng: &mut R) -> Board {
        self.walk(initial, rng, None)
    }

    /// Like [`shuffle`](Self::shuffle), also returning every position the
    /// empty cell visited, starting with its initial position.
    pub fn shuffle_traced<R: RandomSource + ?Sized>(
        &self,
        initial: &Board,
        rng: &mut R,
    ) -> (Board, Vec<usize>) {
        let mut trace = vec![initial.empty_index()];
        let board = self.walk(initial, rng, Some(&mut trace));
        (board, trace)
    }

    fn walk<R: RandomSource + ?Sized>(
        &self,
        initial: &Board,
        rng: &mut R,
        mut trace: Option<&mut Vec<usize>>,
    ) -> Board {
        let mut board = initial.clone();
        let size = board.size();
        let moves = self.config.shuffle_moves(size);

        let mut step = |board: &mut Board| {
            let options = valid_moves(board.empty_index(), size);
            // A grid of size >= 2 gives every cell at least two neighbors
            let pick = rng.pick_index(options.len()).unwrap_or(0);
            let target = options[pick];
            board.swap_empty(target);
            if let Some(trace) = trace.as_deref_mut() {
                trace.push(target);
            }
        };

        for _ in 0..moves {
            step(&mut board);
        }

        let forced = moves == 0 && board.is_solved();
        if forced {
            step(&mut board);
        }

        debug!(
            "shuffled {}x{} board with {} moves{}",
            size,
            size,
            moves,
            if forced { " plus one forced move" } else { "" }
        );

        board
    }
}
