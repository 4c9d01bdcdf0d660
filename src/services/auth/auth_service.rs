//! # Authentication Service
//!
//! Password login, signup and LinkedIn find-or-create.
//!
//! Login never issues a token to an account with two-factor enabled; the client is told to
//! go through `request-2fa` / `verify-2fa` instead.

use std::sync::Arc;

use crate::config::PasswordConfig;
use crate::domain::dto::auth::{
    AuthenticatedResponse, LoginResponse, SignupRequest, SignupResponse, TwoFactorRequiredResponse,
};
use crate::domain::dto::users::UserResponse;
use crate::domain::entities::users::{Role, User};
use crate::domain::models::oauth::LinkedinProfile;
use crate::errors::{AppError, AppResult};
use crate::repositories::users::UserStore;
use crate::services::mail::{student_welcome_email, MailService};
use crate::utils::string_utils::{normalize_email, validate_required_string};

use super::password::{ensure_active, hash_password, verify_user_password};
use super::token_service::TokenService;
use super::two_factor_service::user_not_found;

pub const TWO_FACTOR_REQUIRED_MESSAGE: &str = "2FA verification required";

/// Authentication service
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    mail: MailService,
    password: PasswordConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<TokenService>,
        mail: MailService,
        password: PasswordConfig,
    ) -> Self {
        Self {
            users,
            tokens,
            mail,
            password,
        }
    }

    /// Password login.
    ///
    /// # Returns
    ///
    /// * `LoginResponse::TwoFactorRequired` - two-factor is enabled; no token issued
    /// * `LoginResponse::Authenticated` - user and access token
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - no user with this email
    /// * `AppError::AuthenticationError` - wrong password or deactivated account
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// match auth_service.login("user@example.com", "Passw0rd!").await? {
    ///     LoginResponse::TwoFactorRequired(r) => println!("verify code for {}", r.email),
    ///     LoginResponse::Authenticated(r) => println!("token {}", r.access_token),
    /// }
    /// ```
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let email = normalize_email(email);
        let start_time = std::time::Instant::now();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| user_not_found(&email))?;

        verify_user_password(&user, password)?;

        ensure_active(&user)?;

        log::debug!("Credential check took: {:?}", start_time.elapsed());

        if user.two_factor_enabled {
            let user_id = user
                .id_string()
                .ok_or_else(|| AppError::InternalError("Stored user has no id".to_string()))?;
            log::info!("Login for user {} requires 2FA", user_id);

            return Ok(LoginResponse::TwoFactorRequired(TwoFactorRequiredResponse {
                require_2fa: true,
                user_id,
                email: user.email,
                message: TWO_FACTOR_REQUIRED_MESSAGE.to_string(),
            }));
        }

        let access_token = self.tokens.generate_access_token(&user)?;
        Ok(LoginResponse::Authenticated(AuthenticatedResponse {
            user: UserResponse::from(user),
            access_token,
        }))
    }

    /// Registers a password account and issues a token.
    ///
    /// Students get a welcome mail in the background.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - blank name
    /// * `AppError::ConflictError` - the email is already registered
    pub async fn signup(&self, request: SignupRequest) -> AppResult<SignupResponse> {
        let name = validate_required_string(&request.name, "name")?;
        let email = normalize_email(&request.email);
        let role = request.role.unwrap_or_default();

        let password_hash = hash_password(&request.password, self.password.bcrypt_cost)?;
        let user = self
            .users
            .insert(User::new_local(email, name, password_hash, role))
            .await?;

        log::info!(
            "User registered: {} ({})",
            user.id_string().unwrap_or_default(),
            role.as_str()
        );

        if role == Role::Student {
            self.mail.dispatch(student_welcome_email(&user.email, &user.name));
        }

        let access_token = self.tokens.generate_access_token(&user)?;
        Ok(SignupResponse {
            user: UserResponse::from(user),
            access_token,
        })
    }

    /// Resolves a LinkedIn profile to a user, creating an active student on first sign-in.
    ///
    /// An existing account with the same email is returned as is.
    pub async fn validate_linkedin_user(&self, profile: LinkedinProfile) -> AppResult<User> {
        let email = normalize_email(&profile.email);
        if email.is_empty() {
            return Err(AppError::ValidationError("LinkedIn profile has no email".to_string()));
        }

        if let Some(user) = self.users.find_by_email(&email).await? {
            return Ok(user);
        }

        let user = self
            .users
            .insert(User::new_linkedin(email, profile.name, profile.provider_id))
            .await?;
        log::info!(
            "Student created from LinkedIn profile: {}",
            user.id_string().unwrap_or_default()
        );

        Ok(user)
    }

    /// Access token for an already authenticated user, e.g. after LinkedIn sign-in.
    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        self.tokens.generate_access_token(user)
    }
}
