//! Identity provider seam.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::core::UserId;

/// Resolves the user behind the current session.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` without an active session.
    async fn current_user(&self) -> Option<UserId>;
}

/// Identity held in memory, switched by sign in and sign out.
#[derive(Debug, Default)]
pub struct StaticIdentity {
    user: Mutex<Option<UserId>>,
}

impl StaticIdentity {
    /// Start signed in as `user`.
    pub fn signed_in(user: UserId) -> Self {
        Self {
            user: Mutex::new(Some(user)),
        }
    }

    /// Start with no session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user: UserId) {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Option<UserId> {
        self.user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let identity = StaticIdentity::anonymous();
        assert_eq!(identity.current_user().await, None);

        identity.sign_in(UserId::new("u-1"));
        assert_eq!(identity.current_user().await, Some(UserId::new("u-1")));

        identity.sign_out();
        assert_eq!(identity.current_user().await, None);
    }
}
