//! Core types: identifiers, injected randomness, configuration.
//!
//! Shared by the puzzle engine and the reward service, which otherwise
//! know nothing about each other.

pub mod ids;
pub mod rng;
pub mod config;

pub use ids::{ClaimId, CouponId, Tier, UserId};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom, SeededRandomState};
pub use config::{CountFailurePolicy, PuzzleConfig, RewardConfig};
