//! # coupon-arcade
//!
//! Game and reward logic for a small minigames client.
//!
//! ## Components
//!
//! 1. **Sliding puzzle**: builds solved boards, lists legal moves, and
//!    scrambles boards by a random walk of legal moves. Every shuffled
//!    board is solvable by construction.
//!
//! 2. **Rewards**: users claim a random coupon from a tier pool, at most
//!    twice per week. Weeks start Monday 00:00 local time.
//!
//! The two share nothing but the `core` types. A hosting application wires
//! each to its own view.
//!
//! ## Collaborators
//!
//! Session lookup, persistence, time and randomness are injected as
//! trait objects (`IdentityProvider`, `ClaimStore`, `Clock`,
//! `RandomSource`), so tests run against deterministic stand-ins.
//!
//! ## Modules
//!
//! - `core`: identifiers, random sources, configuration
//! - `puzzle`: boards and the puzzle engine
//! - `rewards`: week windows, store contract, reward service

pub mod core;
pub mod puzzle;
pub mod rewards;

// Re-export commonly used types
pub use crate::core::{
    ClaimId, CouponId, Tier, UserId,
    RandomSource, SeededRandom, SeededRandomState, ScriptedRandom,
    PuzzleConfig, RewardConfig, CountFailurePolicy,
};

pub use crate::puzzle::{Board, Moves, PuzzleEngine, valid_moves};

pub use crate::rewards::{
    WeekWindow, Clock, SystemClock, FixedClock,
    IdentityProvider, StaticIdentity,
    ClaimStore, ClaimFilter, ClaimRecord, ClaimStatus, ClaimWithCoupon, CouponPoolEntry,
    NewClaim, QuotaInsert, StoreError, InMemoryClaimStore, StoreFaults,
    RewardError, RewardService,
};
