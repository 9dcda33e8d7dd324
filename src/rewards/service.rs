//! Weekly-quota reward claims.
//!
//! A claim attempt moves through these steps, each gating the next:
//!
//! 1. Count the user's claims in the current week window. At or above the
//!    limit the claim is rejected with `QuotaExceeded`.
//! 2. Load the tier's pool. An empty or failed load is `NoInventory`.
//! 3. Draw one entry uniformly from the pool.
//! 4. Append the claim through the store's quota-guarded insert, so two
//!    sessions racing past step 1 cannot both land a claim over the limit.
//!
//! Counting outside a claim follows [`CountFailurePolicy`]: by default a
//! failed count reads as zero.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use super::{
    ClaimFilter, ClaimStore, ClaimWithCoupon, Clock, IdentityProvider, NewClaim, QuotaInsert,
    RewardError, WeekWindow,
};
use crate::core::{CountFailurePolicy, RandomSource, RewardConfig, Tier, UserId};

/// Coordinates identity, clock, randomness and the store for reward claims.
pub struct RewardService {
    config: RewardConfig,
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn ClaimStore>,
    clock: Arc<dyn Clock>,
    rng: Mutex<Box<dyn RandomSource + Send>>,
}

impl RewardService {
    /// Create a service with the default configuration.
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn ClaimStore>,
        clock: Arc<dyn Clock>,
        rng: impl RandomSource + Send + 'static,
    ) -> Self {
        Self {
            config: RewardConfig::default(),
            identity,
            store,
            clock,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: RewardConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the service configuration.
    #[must_use]
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// The week window containing the current time.
    #[must_use]
    pub fn current_window(&self) -> WeekWindow {
        self.clock.week_window()
    }

    /// Next Monday 00:00 local time strictly after now.
    ///
    /// At exactly Monday 00:00 this is one week away.
    #[must_use]
    pub fn next_reset_date(&self) -> DateTime<Utc> {
        self.current_window().next_reset()
    }

    /// Claims made this week by the signed-in user.
    ///
    /// Zero without a session.
    pub async fn weekly_reward_count(&self) -> u32 {
        match self.identity.current_user().await {
            Some(user) => self.weekly_reward_count_for(&user).await,
            None => 0,
        }
    }

    /// Claims made this week by `user`.
    ///
    /// A failed count reads as zero under `FailOpen` and as the full quota
    /// under `FailClosed`.
    pub async fn weekly_reward_count_for(&self, user: &UserId) -> u32 {
        let window = self.current_window();
        self.count_in_window(user, &window).await
    }

    /// Whether the signed-in user can still claim this week.
    pub async fn check_weekly_limit(&self) -> bool {
        self.weekly_reward_count().await < self.config.weekly_limit
    }

    /// Whether `user` can still claim this week.
    pub async fn check_weekly_limit_for(&self, user: &UserId) -> bool {
        self.weekly_reward_count_for(user).await < self.config.weekly_limit
    }

    /// Claim a random coupon for the signed-in user.
    ///
    /// `tier` defaults to the configured default tier.
    pub async fn claim_reward(&self, tier: Option<Tier>) -> Result<ClaimWithCoupon, RewardError> {
        let user = self
            .identity
            .current_user()
            .await
            .ok_or(RewardError::Unauthenticated)?;
        self.claim_reward_for(&user, tier).await
    }

    /// Claim a random coupon for `user`.
    pub async fn claim_reward_for(
        &self,
        user: &UserId,
        tier: Option<Tier>,
    ) -> Result<ClaimWithCoupon, RewardError> {
        let tier = tier.unwrap_or(self.config.default_tier);
        let limit = self.config.weekly_limit;
        let window = self.current_window();

        let count = self.count_in_window(user, &window).await;
        if count >= limit {
            debug!("{} has {} of {} claims this week", user, count, limit);
            return Err(self.quota_exceeded(&window));
        }

        let pool = match self.store.pool_for_tier(tier).await {
            Ok(pool) => pool,
            Err(err) => {
                warn!("loading {} pool failed: {}", tier, err);
                return Err(RewardError::NoInventory {
                    tier,
                    cause: Some(err),
                });
            }
        };

        let Some(pick) = self.draw(pool.len()) else {
            return Err(RewardError::NoInventory { tier, cause: None });
        };
        let coupon = &pool[pick];

        let claim = NewClaim::active(user.clone(), coupon.id);
        match self
            .store
            .insert_claim_within_quota(claim, &window, limit)
            .await?
        {
            QuotaInsert::Inserted(joined) => {
                info!(
                    "{} claimed {} ({}) from {}",
                    user, joined.coupon.id, joined.coupon.title, tier
                );
                Ok(joined)
            }
            QuotaInsert::QuotaFull { count } => {
                debug!("{} hit the limit at insert with {} claims", user, count);
                Err(self.quota_exceeded(&window))
            }
        }
    }

    async fn count_in_window(&self, user: &UserId, window: &WeekWindow) -> u32 {
        let filter = ClaimFilter::in_window(user.clone(), window);
        match self.store.count_claims(&filter).await {
            Ok(count) => count,
            Err(err) => match self.config.count_failure {
                CountFailurePolicy::FailOpen => {
                    warn!("counting claims for {} failed, treating as 0: {}", user, err);
                    0
                }
                CountFailurePolicy::FailClosed => {
                    warn!("counting claims for {} failed, treating quota as used: {}", user, err);
                    self.config.weekly_limit
                }
            },
        }
    }

    fn draw(&self, len: usize) -> Option<usize> {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pick_index(len)
    }

    fn quota_exceeded(&self, window: &WeekWindow) -> RewardError {
        RewardError::QuotaExceeded {
            limit: self.config.weekly_limit,
            next_reset: window.next_reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CouponId, ScriptedRandom};
    use crate::rewards::{CouponPoolEntry, FixedClock, InMemoryClaimStore, StaticIdentity, StoreFaults};
    use chrono::{FixedOffset, TimeZone};

    struct Harness {
        service: RewardService,
        store: Arc<InMemoryClaimStore>,
        identity: Arc<StaticIdentity>,
    }

    fn harness(rng: ScriptedRandom) -> Harness {
        let tz = FixedOffset::east_opt(0).unwrap();
        let clock = Arc::new(FixedClock::new(tz.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()));
        let store = Arc::new(InMemoryClaimStore::new(clock.clone()).with_coupons([
            CouponPoolEntry::new(CouponId::new(1), Tier::ONE, "Movie night"),
            CouponPoolEntry::new(CouponId::new(2), Tier::ONE, "Ice cream"),
            CouponPoolEntry::new(CouponId::new(3), Tier::ONE, "Picnic"),
        ]));
        let identity = Arc::new(StaticIdentity::signed_in(UserId::new("ana")));
        let service = RewardService::new(identity.clone(), store.clone(), clock, rng);
        Harness {
            service,
            store,
            identity,
        }
    }

    #[tokio::test]
    async fn test_claim_draws_from_pool() {
        let h = harness(ScriptedRandom::new([0.5]));

        let joined = h.service.claim_reward(None).await.unwrap();

        // 0.5 * 3 lands on the middle entry
        assert_eq!(joined.coupon.id, CouponId::new(2));
        assert_eq!(joined.claim.coupon_id, CouponId::new(2));
        assert_eq!(h.service.weekly_reward_count().await, 1);
    }

    #[tokio::test]
    async fn test_third_claim_rejected() {
        let h = harness(ScriptedRandom::new([0.0]));

        h.service.claim_reward(None).await.unwrap();
        h.service.claim_reward(None).await.unwrap();
        let err = h.service.claim_reward(None).await.unwrap_err();

        assert!(matches!(err, RewardError::QuotaExceeded { limit: 2, .. }));
        assert_eq!(h.store.claims().len(), 2);
    }

    #[tokio::test]
    async fn test_anonymous_counts_zero_and_cannot_claim() {
        let h = harness(ScriptedRandom::new([0.0]));
        h.identity.sign_out();

        assert_eq!(h.service.weekly_reward_count().await, 0);
        assert!(h.service.check_weekly_limit().await);
        assert_eq!(
            h.service.claim_reward(None).await.unwrap_err(),
            RewardError::Unauthenticated
        );
        assert!(h.store.claims().is_empty());
    }

    #[tokio::test]
    async fn test_fail_open_and_fail_closed() {
        let h = harness(ScriptedRandom::new([0.0]));
        let ana = UserId::new("ana");
        h.service.claim_reward(None).await.unwrap();
        h.service.claim_reward(None).await.unwrap();

        h.store.set_faults(StoreFaults {
            count: true,
            ..StoreFaults::default()
        });
        assert_eq!(h.service.weekly_reward_count_for(&ana).await, 0);
        assert!(h.service.check_weekly_limit_for(&ana).await);

        let strict = harness(ScriptedRandom::new([0.0]));
        let service = strict
            .service
            .with_config(RewardConfig::default().with_count_failure(CountFailurePolicy::FailClosed));
        strict.store.set_faults(StoreFaults {
            count: true,
            ..StoreFaults::default()
        });
        assert_eq!(service.weekly_reward_count_for(&ana).await, 2);
        assert!(!service.check_weekly_limit_for(&ana).await);
    }

    #[tokio::test]
    async fn test_next_reset_is_next_monday() {
        let h = harness(ScriptedRandom::new([0.0]));
        assert_eq!(
            h.service.next_reset_date(),
            Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap()
        );
    }
}
