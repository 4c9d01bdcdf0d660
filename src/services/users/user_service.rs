//! # User Service
//!
//! Profile lookup for the authenticated user and role checks for restricted endpoints.
//!
//! Tokens carry only `{sub, email}`. Roles are read from the store on every check so a role
//! change takes effect without reissuing tokens.

use std::sync::Arc;

use crate::domain::dto::users::UserResponse;
use crate::domain::entities::users::{Role, User};
use crate::errors::{AppError, AppResult};
use crate::repositories::users::UserStore;

/// User profile service
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Public profile of `user_id`.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - `user_id` is not an ObjectId
    /// * `AppError::NotFound` - no such user
    pub async fn profile(&self, user_id: &str) -> AppResult<UserResponse> {
        self.load(user_id).await.map(UserResponse::from)
    }

    /// Loads `user_id` and checks it holds `role`.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - no such user
    /// * `AppError::AuthorizationError` - the user lacks `role` or is deactivated
    pub async fn require_role(&self, user_id: &str, role: Role) -> AppResult<User> {
        let user = self.load(user_id).await?;

        if !user.is_active || !user.has_role(role) {
            log::warn!("User {} denied: {} role required", user_id, role.as_str());
            return Err(AppError::AuthorizationError(format!(
                "{} role required",
                role.as_str()
            )));
        }

        Ok(user)
    }

    async fn load(&self, user_id: &str) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }
}
