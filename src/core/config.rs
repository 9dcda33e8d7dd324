//! Configuration types.
//!
//! - `PuzzleConfig`: shuffle depth for the sliding puzzle
//! - `RewardConfig`: weekly quota, default tier, count failure policy
//!
//! Both are plain serde structs with `with_*` builders so a hosting
//! application can load them from whatever format it already uses.

use serde::{Deserialize, Serialize};

use super::Tier;

/// Sliding puzzle configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Random moves per grid size step above 2.
    ///
    /// A shuffle performs `moves_per_size_step * (size - 2)` moves.
    pub moves_per_size_step: usize,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            moves_per_size_step: 100,
        }
    }
}

impl PuzzleConfig {
    /// Set the moves per size step.
    #[must_use]
    pub fn with_moves_per_size_step(mut self, moves: usize) -> Self {
        self.moves_per_size_step = moves;
        self
    }

    /// Number of random-walk moves a shuffle of this size performs.
    #[must_use]
    pub fn shuffle_moves(&self, size: usize) -> usize {
        self.moves_per_size_step * size.saturating_sub(2)
    }
}

/// What to do when the weekly claim count cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountFailurePolicy {
    /// Treat the count as zero. A store outage can let extra claims through.
    #[default]
    FailOpen,
    /// Treat the quota as exhausted. A store outage blocks all claims.
    FailClosed,
}

/// Reward workflow configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Claims allowed per week window.
    pub weekly_limit: u32,

    /// Tier drawn from when the caller does not choose one.
    pub default_tier: Tier,

    /// Behavior when the count query fails.
    pub count_failure: CountFailurePolicy,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            weekly_limit: 2,
            default_tier: Tier::ONE,
            count_failure: CountFailurePolicy::FailOpen,
        }
    }
}

impl RewardConfig {
    /// Set the weekly claim limit.
    #[must_use]
    pub fn with_weekly_limit(mut self, limit: u32) -> Self {
        self.weekly_limit = limit;
        self
    }

    /// Set the default tier.
    #[must_use]
    pub fn with_default_tier(mut self, tier: Tier) -> Self {
        self.default_tier = tier;
        self
    }

    /// Set the count failure policy.
    #[must_use]
    pub fn with_count_failure(mut self, policy: CountFailurePolicy) -> Self {
        self.count_failure = policy;
        self
    }
}
