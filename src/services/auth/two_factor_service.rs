//! # Two-Factor Challenge Service
//!
//! Email-code challenge layered on the user record.
//!
//! ```text
//!  NO_2FA ──request_challenge──▶ CHALLENGE_PENDING ──verify_challenge(ok)──▶ VERIFIED
//!                                   │    ▲                                (twoFactorEnabled,
//!                                   │    └── request_challenge (overwrites)  no pending code)
//!                                   └── verify after expiry: cleared, 400
//! ```
//!
//! - At most one challenge is pending per user; a new request replaces the old code.
//! - A wrong code leaves the challenge in place so the user can retry until it expires.
//! - An expired challenge is cleared when a verify attempt reads it.
//! - Read, compare and clear are separate store calls. Two concurrent verifies with the same
//!   code can both succeed.

use std::sync::Arc;

use mongodb::bson::DateTime;
use rand::Rng;

use crate::config::TwoFactorConfig;
use crate::domain::dto::auth::{MessageResponse, TwoFactorChallengeResponse, TwoFactorVerifiedResponse};
use crate::domain::dto::users::UserResponse;
use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult};
use crate::repositories::users::{ChallengeUpdate, TwoFactorUpdate, UserStore};
use crate::services::mail::{two_factor_code_email, MailService};
use crate::utils::string_utils::normalize_email;

use super::password::{ensure_active, verify_user_password};
use super::token_service::TokenService;

pub const CODE_SENT_MESSAGE: &str = "2FA code sent to your email";
pub const NO_CODE_REQUESTED_MESSAGE: &str = "No 2FA code requested";
pub const CODE_EXPIRED_MESSAGE: &str = "2FA code has expired";
pub const INVALID_CODE_MESSAGE: &str = "Invalid 2FA code";
pub const VERIFIED_MESSAGE: &str = "2FA verified successfully";
pub const ENABLED_MESSAGE: &str = "2FA enabled successfully";
pub const DISABLED_MESSAGE: &str = "2FA disabled successfully";

/// Uniformly random six-digit code, zero padded.
pub fn generate_code() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", value)
}

/// Two-factor challenge flow
pub struct TwoFactorService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    mail: MailService,
    config: TwoFactorConfig,
}

impl TwoFactorService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<TokenService>,
        mail: MailService,
        config: TwoFactorConfig,
    ) -> Self {
        Self {
            users,
            tokens,
            mail,
            config,
        }
    }

    /// Issues a new code after checking the password and mails it to the user.
    ///
    /// The response carries the email only, never the code. Mail delivery happens in the
    /// background and does not affect the result.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - no user with this email
    /// * `AppError::AuthenticationError` - wrong password or deactivated account
    pub async fn request_challenge(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<TwoFactorChallengeResponse> {
        let user = self.find_user_by_email(email).await?;
        verify_user_password(&user, password)?;
        ensure_active(&user)?;

        let user_id = user_id(&user)?;
        let code = generate_code();
        let expires_at =
            DateTime::from_millis(DateTime::now().timestamp_millis() + self.config.code_ttl_millis());

        self.users
            .update_two_factor(&user_id, TwoFactorUpdate::set_challenge(code.clone(), expires_at))
            .await?
            .ok_or_else(|| user_not_found(&user.email))?;

        log::info!("2FA challenge issued for user {}", user_id);

        self.mail.dispatch(two_factor_code_email(
            &user.email,
            &user.name,
            &code,
            self.config.code_ttl_minutes,
        ));

        Ok(TwoFactorChallengeResponse {
            message: CODE_SENT_MESSAGE.to_string(),
            email: user.email,
        })
    }

    /// Checks a submitted code against the pending challenge.
    ///
    /// On success the challenge is cleared, two-factor is switched on and an access token is
    /// issued.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - no user with this email
    /// * `AppError::BadRequest` - no pending challenge, or it expired (the challenge is cleared)
    /// * `AppError::AuthenticationError` - code mismatch (the challenge stays pending), or the
    ///   account was deactivated
    pub async fn verify_challenge(&self, email: &str, code: &str) -> AppResult<TwoFactorVerifiedResponse> {
        let user = self.find_user_by_email(email).await?;
        let user_id = user_id(&user)?;
        ensure_active(&user)?;

        let challenge = user
            .pending_challenge()
            .ok_or_else(|| AppError::BadRequest(NO_CODE_REQUESTED_MESSAGE.to_string()))?;

        if challenge.is_expired_at(DateTime::now()) {
            self.users
                .update_two_factor(&user_id, TwoFactorUpdate::clear_challenge())
                .await?;
            log::info!("Expired 2FA challenge cleared for user {}", user_id);
            return Err(AppError::BadRequest(CODE_EXPIRED_MESSAGE.to_string()));
        }

        if !challenge.matches(code) {
            log::warn!("Invalid 2FA code submitted for user {}", user_id);
            return Err(AppError::AuthenticationError(INVALID_CODE_MESSAGE.to_string()));
        }

        let updated = self
            .users
            .update_two_factor(&user_id, TwoFactorUpdate::enable(ChallengeUpdate::Clear))
            .await?
            .ok_or_else(|| user_not_found(&user.email))?;
        ensure_active(&updated)?;

        let access_token = self.tokens.generate_access_token(&updated)?;
        log::info!("2FA verified for user {}", user_id);

        Ok(TwoFactorVerifiedResponse {
            message: VERIFIED_MESSAGE.to_string(),
            access_token,
            user: UserResponse::from(updated),
        })
    }

    /// Turns two-factor on. A pending challenge is left as is.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - unknown user id
    pub async fn enable(&self, user_id: &str) -> AppResult<MessageResponse> {
        self.users
            .update_two_factor(user_id, TwoFactorUpdate::enable(ChallengeUpdate::Keep))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        Ok(MessageResponse::new(ENABLED_MESSAGE))
    }

    /// Turns two-factor off and drops any pending challenge.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - unknown user id
    pub async fn disable(&self, user_id: &str) -> AppResult<MessageResponse> {
        self.users
            .update_two_factor(user_id, TwoFactorUpdate::disable())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        Ok(MessageResponse::new(DISABLED_MESSAGE))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<User> {
        let email = normalize_email(email);
        self.users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| user_not_found(&email))
    }
}

fn user_id(user: &User) -> AppResult<String> {
    user.id_string()
        .ok_or_else(|| AppError::InternalError("Stored user has no id".to_string()))
}

pub(crate) fn user_not_found(email: &str) -> AppError {
    AppError::NotFound(format!("User with email {} not found", email))
}
