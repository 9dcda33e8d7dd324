//! Rejections surfaced by the reward workflow.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::StoreError;
use crate::core::Tier;

/// Why a claim did not happen.
///
/// None of these are retried by the service.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RewardError {
    /// The weekly quota is used up. Recoverable once the window rolls over.
    #[error("weekly limit reached ({limit} coupons per week), come back after {next_reset}")]
    QuotaExceeded {
        limit: u32,
        next_reset: DateTime<Utc>,
    },

    /// The tier's pool is empty or could not be loaded.
    #[error("no coupons available in {tier} right now")]
    NoInventory {
        tier: Tier,
        #[source]
        cause: Option<StoreError>,
    },

    /// The claim insert failed.
    #[error("could not record claim: {0}")]
    Store(#[from] StoreError),

    /// No session to claim for.
    #[error("no authenticated user")]
    Unauthenticated,
}

impl RewardError {
    /// Whether the user should be shown this as a normal outcome rather
    /// than a fault.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            RewardError::QuotaExceeded { .. } | RewardError::NoInventory { .. }
        )
    }
}
