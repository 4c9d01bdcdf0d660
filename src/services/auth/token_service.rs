//! JWT issuing and verification
//!
//! HS256 access tokens carrying `{sub, email, iat, exp}`. Secret and lifetime come from
//! [`JwtConfig`].

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::JwtConfig;
use crate::domain::entities::users::User;
use crate::domain::models::token::TokenClaims;
use crate::errors::{AppError, ErrorContext};

/// JWT service
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            expiration_hours: config.expiration_hours,
        }
    }

    /// Issues an access token bound to the user's id and email.
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - the user has no id or signing failed
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let access_token = token_service.generate_access_token(&user)?;
    /// ```
    pub fn generate_access_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.expiration_hours);

        let claims = TokenClaims {
            sub: user
                .id_string()
                .ok_or_else(|| AppError::InternalError("User has no id".to_string()))?,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to sign access token")
    }

    /// Verifies signature and expiry and returns the claims.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - expired, malformed or forged token
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError("Token has expired".to_string())
                }
                _ => {
                    log::debug!("Token rejected: {}", e);
                    AppError::AuthenticationError("Invalid token".to_string())
                }
            })
    }

    /// Strips the `Bearer ` prefix of an `Authorization` header.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - the header is not a bearer credential
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("Invalid authorization header".to_string()))
    }
}
