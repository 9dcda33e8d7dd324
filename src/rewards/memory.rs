//! In-memory claim store.
//!
//! Holds pools and claims behind one mutex, so the quota-guarded insert
//! counts and appends without another caller interleaving. Useful as a
//! local backend and for exercising the reward workflow in tests,
//! including store failures via [`StoreFaults`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;

use super::{
    ClaimFilter, ClaimRecord, ClaimStatus, ClaimStore, ClaimWithCoupon, Clock, CouponPoolEntry,
    NewClaim, QuotaInsert, StoreError, WeekWindow,
};
use crate::core::{ClaimId, CouponId, Tier, UserId};

/// Which store operations should fail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreFaults {
    pub count: bool,
    pub pool: bool,
    pub insert: bool,
}

#[derive(Debug, Default)]
struct Inner {
    coupons: FxHashMap<CouponId, CouponPoolEntry>,
    /// Coupon ids per tier, in insertion order.
    tiers: FxHashMap<Tier, Vec<CouponId>>,
    claims: Vec<ClaimRecord>,
    next_claim_id: i64,
    faults: StoreFaults,
}

impl Inner {
    fn count(&self, filter: &ClaimFilter) -> u32 {
        let n = self.claims.iter().filter(|c| filter.matches(c)).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    fn append(
        &mut self,
        claim: NewClaim,
        created_at: DateTime<Utc>,
    ) -> Result<ClaimWithCoupon, StoreError> {
        if self.faults.insert {
            return Err(StoreError::Rejected("insert fault injected".into()));
        }
        let coupon = self
            .coupons
            .get(&claim.coupon_id)
            .cloned()
            .ok_or(StoreError::UnknownCoupon(claim.coupon_id))?;

        self.next_claim_id += 1;
        let record = ClaimRecord {
            id: ClaimId::new(self.next_claim_id),
            user_id: claim.user_id,
            coupon_id: claim.coupon_id,
            created_at,
            status: claim.status,
        };
        self.claims.push(record.clone());

        Ok(ClaimWithCoupon {
            claim: record,
            coupon,
        })
    }
}

/// Claim store kept in process memory.
pub struct InMemoryClaimStore {
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
}

impl InMemoryClaimStore {
    /// Create an empty store stamping claims with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Add a coupon to its tier's pool.
    pub fn add_coupon(&self, entry: CouponPoolEntry) {
        let mut inner = self.lock();
        let ids = inner.tiers.entry(entry.tier).or_default();
        if !ids.contains(&entry.id) {
            ids.push(entry.id);
        }
        inner.coupons.insert(entry.id, entry);
    }

    /// Add several coupons.
    #[must_use]
    pub fn with_coupons(self, entries: impl IntoIterator<Item = CouponPoolEntry>) -> Self {
        for entry in entries {
            self.add_coupon(entry);
        }
        self
    }

    /// Append a historical claim with an explicit timestamp.
    ///
    /// Bypasses quota and fault checks.
    pub fn record_claim_at(
        &self,
        user_id: UserId,
        coupon_id: CouponId,
        created_at: DateTime<Utc>,
    ) -> ClaimId {
        let mut inner = self.lock();
        inner.next_claim_id += 1;
        let id = ClaimId::new(inner.next_claim_id);
        inner.claims.push(ClaimRecord {
            id,
            user_id,
            coupon_id,
            created_at,
            status: ClaimStatus::Active,
        });
        id
    }

    /// Replace the active fault set.
    pub fn set_faults(&self, faults: StoreFaults) {
        self.lock().faults = faults;
    }

    /// Snapshot of every claim, oldest first.
    #[must_use]
    pub fn claims(&self) -> Vec<ClaimRecord> {
        self.lock().claims.clone()
    }

    /// Snapshot of one user's claims, oldest first.
    #[must_use]
    pub fn claims_for(&self, user_id: &UserId) -> Vec<ClaimRecord> {
        self.lock()
            .claims
            .iter()
            .filter(|c| &c.user_id == user_id)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stamp(&self) -> DateTime<Utc> {
        self.clock.now().with_timezone(&Utc)
    }
}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn count_claims(&self, filter: &ClaimFilter) -> Result<u32, StoreError> {
        let inner = self.lock();
        if inner.faults.count {
            return Err(StoreError::Unavailable("count fault injected".into()));
        }
        Ok(inner.count(filter))
    }

    async fn pool_for_tier(&self, tier: Tier) -> Result<Vec<CouponPoolEntry>, StoreError> {
        let inner = self.lock();
        if inner.faults.pool {
            return Err(StoreError::Query("pool fault injected".into()));
        }
        let pool: Vec<CouponPoolEntry> = inner
            .tiers
            .get(&tier)
            .map(|ids| ids.iter().filter_map(|id| inner.coupons.get(id).cloned()).collect())
            .unwrap_or_default();
        Ok(pool)
    }

    async fn insert_claim(&self, claim: NewClaim) -> Result<ClaimWithCoupon, StoreError> {
        let created_at = self.stamp();
        self.lock().append(claim, created_at)
    }

    async fn insert_claim_within_quota(
        &self,
        claim: NewClaim,
        window: &WeekWindow,
        limit: u32,
    ) -> Result<QuotaInsert, StoreError> {
        let created_at = self.stamp();
        let mut inner = self.lock();

        let filter = ClaimFilter::in_window(claim.user_id.clone(), window);
        let count = inner.count(&filter);
        if count >= limit {
            return Ok(QuotaInsert::QuotaFull { count });
        }
        inner.append(claim, created_at).map(QuotaInsert::Inserted)
    }
}
