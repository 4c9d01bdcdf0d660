//! In-memory [`UserStore`] for service and handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime};

use crate::domain::entities::users::{TwoFactorChallenge, User};
use crate::errors::{AppError, AppResult};

use super::{ChallengeUpdate, TwoFactorUpdate, UserStore};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<ObjectId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `user` directly, assigning an id when missing.
    pub fn seed(&self, mut user: User) -> User {
        let id = *user.id.get_or_insert_with(ObjectId::new);
        self.users.lock().unwrap().insert(id, user.clone());
        user
    }

    /// Current state of a stored user.
    pub fn get(&self, id: &ObjectId) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }

    /// Overwrites the stored challenge, e.g. to backdate its expiry.
    pub fn force_challenge(&self, id: &ObjectId, challenge: Option<TwoFactorChallenge>) {
        if let Some(user) = self.users.lock().unwrap().get_mut(id) {
            user.set_challenge(challenge);
        }
    }

    pub fn set_active(&self, id: &ObjectId, active: bool) {
        if let Some(user) = self.users.lock().unwrap().get_mut(id) {
            user.is_active = active;
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;
        Ok(self.get(&object_id))
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError(format!(
                "User with email {} already exists",
                user.email
            )));
        }
        Ok(self.seed(user))
    }

    async fn update_two_factor(&self, id: &str, update: TwoFactorUpdate) -> AppResult<Option<User>> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(&object_id) else {
            return Ok(None);
        };

        if let Some(enabled) = update.enabled {
            user.two_factor_enabled = enabled;
        }
        match update.challenge {
            ChallengeUpdate::Keep => {}
            ChallengeUpdate::Set { code, expires_at } => {
                user.set_challenge(Some(TwoFactorChallenge { code, expires_at }))
            }
            ChallengeUpdate::Clear => user.set_challenge(None),
        }
        user.updated_at = DateTime::now();

        Ok(Some(user.clone()))
    }
}
