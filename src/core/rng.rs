//! Injected randomness for shuffling boards and drawing rewards.
//!
//! Both the puzzle engine and the reward service consume entropy only
//! through [`RandomSource`], so tests can swap in a seeded or scripted
//! source and reproduce every draw.
//!
//! ```
//! use coupon_arcade::core::{RandomSource, SeededRandom};
//!
//! let mut a = SeededRandom::new(42);
//! let mut b = SeededRandom::new(42);
//! assert_eq!(a.uniform(), b.uniform());
//!
//! // Independent streams for independent concerns
//! let mut puzzle = a.for_context("puzzle");
//! let mut rewards = a.for_context("rewards");
//! assert_ne!(puzzle.uniform(), rewards.uniform());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A source of uniform floats in `[0, 1)`.
///
/// No cryptographic strength is required.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Pick an index in `0..len` uniformly.
    ///
    /// Returns `None` when `len` is zero.
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let scaled = (self.uniform() * len as f64).floor() as usize;
        // A source returning exactly 1.0 would otherwise land one past the end
        Some(scaled.min(len - 1))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

/// Deterministic ChaCha8-backed random source.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    inner: ChaCha8Rng,
    seed: u64,
}

impl SeededRandom {
    /// Create a new source with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> SeededRandomState {
        SeededRandomState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &SeededRandomState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Serializable checkpoint of a [`SeededRandom`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRandomState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values are clamped into `[0, 1)`.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "ScriptedRandom needs at least one value");
        Self { values, cursor: 0 }
    }

    /// Number of values handed out so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
