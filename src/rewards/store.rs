//! Persistent store contract for coupon pools and claim records.
//!
//! The store owns two collections:
//!
//! - the coupon pool, read-only from this crate, grouped by [`Tier`]
//! - claim records, append-only from this crate
//!
//! Inserted claims come back joined with the pool entry they reference.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::WeekWindow;
use crate::core::{ClaimId, CouponId, Tier, UserId};

/// Failure reported by the store.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("insert rejected: {0}")]
    Rejected(String),

    #[error("{0} does not exist")]
    UnknownCoupon(CouponId),
}

/// Lifecycle of a claimed coupon.
///
/// Claims are created `Active`; redeeming them happens outside this crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    #[default]
    Active,
    Redeemed,
}

/// A coupon that can be drawn from its tier's pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponPoolEntry {
    pub id: CouponId,
    pub tier: Tier,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CouponPoolEntry {
    pub fn new(id: CouponId, tier: Tier, title: impl Into<String>) -> Self {
        Self {
            id,
            tier,
            title: title.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A stored claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: ClaimId,
    pub user_id: UserId,
    pub coupon_id: CouponId,
    /// Assigned by the store on insert.
    pub created_at: DateTime<Utc>,
    pub status: ClaimStatus,
}

/// Fields supplied when appending a claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClaim {
    pub user_id: UserId,
    pub coupon_id: CouponId,
    pub status: ClaimStatus,
}

impl NewClaim {
    /// An active claim of `coupon_id` by `user_id`.
    pub fn active(user_id: UserId, coupon_id: CouponId) -> Self {
        Self {
            user_id,
            coupon_id,
            status: ClaimStatus::Active,
        }
    }
}

/// A claim joined with the pool entry it references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimWithCoupon {
    #[serde(flatten)]
    pub claim: ClaimRecord,
    pub coupon: CouponPoolEntry,
}

/// Claims by one user created at or after `since`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimFilter {
    pub user_id: UserId,
    pub since: DateTime<Utc>,
}

impl ClaimFilter {
    /// Claims by `user_id` since the start of `window`.
    pub fn in_window(user_id: UserId, window: &WeekWindow) -> Self {
        Self {
            user_id,
            since: window.start,
        }
    }

    /// Check if a record matches.
    #[must_use]
    pub fn matches(&self, record: &ClaimRecord) -> bool {
        record.user_id == self.user_id && record.created_at >= self.since
    }
}

/// Outcome of a quota-guarded insert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuotaInsert {
    /// The claim was appended.
    Inserted(ClaimWithCoupon),
    /// The window already held `count` claims; nothing was written.
    QuotaFull { count: u32 },
}

/// Remote store used by the reward workflow.
///
/// ## Implementation Notes
///
/// - `count_claims` counts, it never loads rows
/// - `pool_for_tier` returns an empty vec for an empty pool, not an error
/// - `insert_claim` stamps `created_at` and joins the coupon
/// - `insert_claim_within_quota` must be atomic in stores shared by
///   concurrent sessions; the default is two round trips and is not
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Count claims matching `filter`.
    async fn count_claims(&self, filter: &ClaimFilter) -> Result<u32, StoreError>;

    /// All pool entries in `tier`.
    async fn pool_for_tier(&self, tier: Tier) -> Result<Vec<CouponPoolEntry>, StoreError>;

    /// Append a claim and return it joined with its coupon.
    async fn insert_claim(&self, claim: NewClaim) -> Result<ClaimWithCoupon, StoreError>;

    /// Append a claim only if the user holds fewer than `limit` claims in
    /// `window`.
    async fn insert_claim_within_quota(
        &self,
        claim: NewClaim,
        window: &WeekWindow,
        limit: u32,
    ) -> Result<QuotaInsert, StoreError> {
        let filter = ClaimFilter::in_window(claim.user_id.clone(), window);
        let count = self.count_claims(&filter).await?;
        if count >= limit {
            return Ok(QuotaInsert::QuotaFull { count });
        }
        self.insert_claim(claim).await.map(QuotaInsert::Inserted)
    }
}
