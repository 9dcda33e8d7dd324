//! Weekly-quota coupon rewards.
//!
//! The service talks to three collaborators through traits, each injected
//! at construction:
//!
//! - `IdentityProvider`: who is signed in
//! - `ClaimStore`: coupon pools and claim records
//! - `Clock`: local wall-clock time for week windows
//!
//! plus a `RandomSource` for the draw. Nothing is cached between calls.

pub mod week;
pub mod clock;
pub mod identity;
pub mod store;
pub mod memory;
pub mod error;
pub mod service;

pub use week::WeekWindow;
pub use clock::{Clock, FixedClock, SystemClock};
pub use identity::{IdentityProvider, StaticIdentity};
pub use store::{
    ClaimFilter, ClaimRecord, ClaimStatus, ClaimStore, ClaimWithCoupon, CouponPoolEntry, NewClaim,
    QuotaInsert, StoreError,
};
pub use memory::{InMemoryClaimStore, StoreFaults};
pub use error::RewardError;
pub use service::RewardService;
