//! Identifiers shared by the reward workflow.
//!
//! ## UserId
//!
//! Opaque identity handed out by the identity provider. The core never
//! interprets it, it only filters and stamps claim records with it.
//!
//! ## CouponId / ClaimId
//!
//! Row identifiers assigned by the store.
//!
//! ## Tier
//!
//! Reward rarity grouping. Only tiers 1, 2 and 3 exist.

use serde::{Deserialize, Serialize};

/// Authenticated user identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User({})", self.0)
    }
}

/// Coupon pool entry identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CouponId(pub i64);

impl CouponId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CouponId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Coupon({})", self.0)
    }
}

/// Claim record identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId(pub i64);

impl ClaimId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Claim({})", self.0)
    }
}

/// Reward tier (1, 2 or 3).
///
/// ```
/// use coupon_arcade::core::Tier;
///
/// assert_eq!(Tier::new(2).map(Tier::raw), Some(2));
/// assert!(Tier::new(0).is_none());
/// assert!(Tier::new(4).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const ONE: Tier = Tier(1);
    pub const TWO: Tier = Tier(2);
    pub const THREE: Tier = Tier(3);

    /// Every tier, lowest first.
    pub const ALL: [Tier; 3] = [Tier::ONE, Tier::TWO, Tier::THREE];

    /// Create a tier, returning `None` outside `1..=3`.
    #[must_use]
    pub const fn new(tier: u8) -> Option<Self> {
        match tier {
            1..=3 => Some(Self(tier)),
            _ => None,
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::ONE
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::new(value).ok_or_else(|| format!("tier must be 1, 2 or 3, got {value}"))
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.0
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tier {}", self.0)
    }
}
