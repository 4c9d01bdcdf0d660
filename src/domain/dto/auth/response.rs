//! Authentication response DTOs
use serde::{Deserialize, Serialize};

use crate::domain::dto::users::UserResponse;

/// Body of `POST /auth/login`
///
/// Accounts with two-factor enabled get [`TwoFactorRequiredResponse`] and no token; everyone
/// else gets [`AuthenticatedResponse`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LoginResponse {
    TwoFactorRequired(TwoFactorRequiredResponse),
    Authenticated(AuthenticatedResponse),
}

impl LoginResponse {
    /// Issued token, if any.
    pub fn access_token(&self) -> Option<&str> {
        match self {
            LoginResponse::Authenticated(r) => Some(&r.access_token),
            LoginResponse::TwoFactorRequired(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorRequiredResponse {
    #[serde(rename = "require2fa")]
    pub require_2fa: bool,
    pub user_id: String,
    pub email: String,
    pub message: String,
}

/// A user together with a freshly issued token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedResponse {
    pub user: UserResponse,
    pub access_token: String,
}

/// Body of `POST /auth/signup`: the new user's fields plus a token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignupResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub access_token: String,
}

/// Body of `POST /auth/request-2fa`. Never includes the code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwoFactorChallengeResponse {
    pub message: String,
    pub email: String,
}

/// Body of `POST /auth/verify-2fa`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwoFactorVerifiedResponse {
    pub message: String,
    pub access_token: String,
    pub user: UserResponse,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
