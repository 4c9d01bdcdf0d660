//! User persistence
//!
//! Services depend on the [`UserStore`] trait rather than on MongoDB directly, so the auth
//! flow runs against [`user_repo::UserRepository`] in production and against an in-memory
//! store in tests.

pub mod user_repo;

#[cfg(test)]
pub mod memory_store;

pub use user_repo::*;

use async_trait::async_trait;
use mongodb::bson::DateTime;

use crate::domain::entities::users::User;
use crate::errors::AppResult;

/// Write applied to the pending two-factor challenge.
///
/// Code and expiry are always written together; there is no way to set one without the other.
#[derive(Debug, Clone, PartialEq)]
pub enum ChallengeUpdate {
    Keep,
    Set { code: String, expires_at: DateTime },
    Clear,
}

/// Two-factor related fields of a single update
#[derive(Debug, Clone, PartialEq)]
pub struct TwoFactorUpdate {
    /// New `twoFactorEnabled`, `None` leaves it unchanged
    pub enabled: Option<bool>,
    pub challenge: ChallengeUpdate,
}

impl TwoFactorUpdate {
    pub fn set_challenge(code: String, expires_at: DateTime) -> Self {
        Self {
            enabled: None,
            challenge: ChallengeUpdate::Set { code, expires_at },
        }
    }

    pub fn clear_challenge() -> Self {
        Self {
            enabled: None,
            challenge: ChallengeUpdate::Clear,
        }
    }

    pub fn enable(challenge: ChallengeUpdate) -> Self {
        Self {
            enabled: Some(true),
            challenge,
        }
    }

    pub fn disable() -> Self {
        Self {
            enabled: Some(false),
            challenge: ChallengeUpdate::Clear,
        }
    }
}

/// User storage operations needed by the auth flow
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up by (already normalized) email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Looks up by hex ObjectId.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - `id` is not a valid ObjectId
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// Inserts a new user and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - the email is already registered
    async fn insert(&self, user: User) -> AppResult<User>;

    /// Applies `update` in one write and returns the updated user, or `None` when no user has
    /// this id.
    async fn update_two_factor(&self, id: &str, update: TwoFactorUpdate) -> AppResult<Option<User>>;
}
