//! Sliding puzzle board.
//!
//! A board of width `size` holds the values `0..size*size` in row-major
//! order. The highest value, `size*size - 1`, is the empty cell. The board
//! is solved when every value sits at its own index.
//!
//! ```
//! use coupon_arcade::puzzle::Board;
//!
//! let mut board = Board::solved(3);
//! assert_eq!(board.empty_index(), 8);
//!
//! // Slide the tile left of the gap into it
//! assert!(board.slide(7));
//! assert_eq!(board.empty_index(), 7);
//! assert!(!board.is_solved());
//!
//! // Tiles not next to the gap stay put
//! assert!(!board.slide(0));
//! ```

use serde::{Deserialize, Serialize};

use super::engine::valid_moves;

/// Permutation-checked puzzle board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard", into = "RawBoard")]
pub struct Board {
    size: usize,
    tiles: Vec<usize>,
    empty: usize,
}

/// Unchecked wire form of a board.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawBoard {
    size: usize,
    tiles: Vec<usize>,
}

impl TryFrom<RawBoard> for Board {
    type Error = String;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        let size = raw.size;
        Board::from_tiles(size, raw.tiles)
            .ok_or_else(|| format!("tiles are not a permutation of a {size}x{size} board"))
    }
}

impl From<Board> for RawBoard {
    fn from(board: Board) -> Self {
        RawBoard {
            size: board.size,
            tiles: board.tiles,
        }
    }
}

impl Board {
    /// Create the solved board of the given width.
    ///
    /// # Panics
    ///
    /// Panics if `size < 2`.
    #[must_use]
    pub fn solved(size: usize) -> Self {
        assert!(size >= 2, "Puzzle size must be at least 2");
        let cells = size * size;
        Self {
            size,
            tiles: (0..cells).collect(),
            empty: cells - 1,
        }
    }

    /// Build a board from an existing tile order.
    ///
    /// Returns `None` if `size < 2`, `size*size` overflows, or `tiles` is
    /// not a permutation of `0..size*size`.
    #[must_use]
    pub fn from_tiles(size: usize, tiles: Vec<usize>) -> Option<Self> {
        let cells = size.checked_mul(size)?;
        if size < 2 || tiles.len() != cells {
            return None;
        }

        let mut seen = vec![false; tiles.len()];
        for &tile in &tiles {
            if tile >= seen.len() || seen[tile] {
                return None;
            }
            seen[tile] = true;
        }

        let empty_value = cells - 1;
        let empty = tiles.iter().position(|&t| t == empty_value)?;
        Some(Self { size, tiles, empty })
    }

    /// Grid width.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Tile values in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[usize] {
        &self.tiles
    }

    /// Consume the board, returning its tiles.
    #[must_use]
    pub fn into_tiles(self) -> Vec<usize> {
        self.tiles
    }

    /// Value that marks the empty cell.
    #[must_use]
    pub fn empty_value(&self) -> usize {
        self.size * self.size - 1
    }

    /// Current position of the empty cell.
    #[must_use]
    pub fn empty_index(&self) -> usize {
        self.empty
    }

    /// Check if every tile is at its home index.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.tiles.iter().enumerate().all(|(i, &t)| i == t)
    }

    /// Count non-empty tiles away from their home index.
    #[must_use]
    pub fn misplaced(&self) -> usize {
        let empty_value = self.empty_value();
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(i, &t)| t != empty_value && i != t)
            .count()
    }

    /// Move the empty cell to `target`.
    ///
    /// Returns `false` and leaves the board untouched unless `target` is
    /// orthogonally adjacent to the empty cell.
    pub fn swap_empty(&mut self, target: usize) -> bool {
        if !valid_moves(self.empty, self.size).contains(&target) {
            return false;
        }
        self.tiles.swap(self.empty, target);
        self.empty = target;
        true
    }

    /// Slide the tile at `tile_index` into the empty cell.
    ///
    /// This is the player's move: clicking a tile next to the gap.
    pub fn slide(&mut self, tile_index: usize) -> bool {
        self.swap_empty(tile_index)
    }

    /// Check solvability with the inversion parity rule.
    ///
    /// Every legal move is one transposition and shifts the empty cell by
    /// one step, so a board is reachable from solved exactly when the
    /// permutation parity matches the parity of the empty cell's taxicab
    /// distance from its home corner.
    #[must_use]
    pub fn is_solvable(&self) -> bool {
        let home = self.empty_value();
        let (er, ec) = (self.empty / self.size, self.empty % self.size);
        let (hr, hc) = (home / self.size, home % self.size);
        let distance = er.abs_diff(hr) + ec.abs_diff(hc);

        permutation_is_odd(&self.tiles) == (distance % 2 == 1)
    }
}

/// Parity of a permutation via cycle decomposition.
fn permutation_is_odd(perm: &[usize]) -> bool {
    let mut visited = vec![false; perm.len()];
    let mut transpositions = 0;

    for start in 0..perm.len() {
        if visited[start] {
            continue;
        }
        let mut len = 0;
        let mut i = start;
        while !visited[i] {
            visited[i] = true;
            i = perm[i];
            len += 1;
        }
        transpositions += len - 1;
    }

    transpositions % 2 == 1
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.empty_value().to_string().len();
        for row in self.tiles.chunks(self.size) {
            let cells: Vec<String> = row
                .iter()
                .map(|&t| {
                    if t == self.empty_value() {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{t:>width$}")
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}
