//! Application error type and the structured error payload.
//!
//! Every failure a caller can observe maps onto one [`AppError`] variant. Client errors
//! (4xx) carry their message through to the response; server errors (5xx) are logged with
//! their detail and surface only a generic message.
//!
//! ## HTTP mapping
//!
//! | AppError | HTTP Status | Scenario |
//! |----------|-------------|----------|
//! | `BadRequest` | 400 | No pending 2FA challenge, expired challenge |
//! | `ValidationError` | 400 | Malformed DTO |
//! | `AuthenticationError` | 401 | Bad password, wrong 2FA code, bad token |
//! | `AuthorizationError` | 403 | Missing role |
//! | `NotFound` | 404 | Unknown email / user / document |
//! | `ConflictError` | 409 | Duplicate email on signup |
//! | `DatabaseError` | 500 | MongoDB failure |
//! | `ExternalServiceError` | 500 | Mail relay failure |
//! | `InternalError` | 500 | Anything unexpected |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn find(repo: &dyn UserStore, email: &str) -> Result<User, AppError> {
//!     repo.find_by_email(email)
//!         .await?
//!         .ok_or_else(|| AppError::NotFound(format!("User with email {} not found", email)))
//! }
//! ```

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned to clients for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Request is well-formed but cannot be processed in the current state (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// DTO validation failure (400)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Credentials, 2FA code or token rejected (401)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Authenticated but not allowed (403)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// Resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate resource (409)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// MongoDB failure (500)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// External collaborator failure, e.g. the mail relay (500)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// Unexpected failure (500)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::ExternalServiceError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller.
    ///
    /// Server-side details never leave the process; 5xx errors collapse into
    /// [`INTERNAL_ERROR_MESSAGE`].
    pub fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::AuthenticationError(msg)
            | AppError::AuthorizationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg) => msg.clone(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::ValidationError(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    /// Builds the bare error response.
    ///
    /// The error envelope middleware later replaces the body with a full [`ErrorBody`]
    /// once the request method and path are known.
    fn error_response(&self) -> HttpResponse {
        let status = self.status();

        if status.is_server_error() {
            log::error!("{}", self);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "statusCode": status.as_u16(),
            "message": self.client_message(),
        }))
    }
}

/// Structured error payload sent to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub method: String,
    pub path: String,
    pub timestamp: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, method: &str, path: &str, message: impl Into<String>) -> Self {
        let message = if status.is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            message.into()
        };

        Self {
            status_code: status.as_u16(),
            method: method.to_string(),
            path: path.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            message,
        }
    }
}

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Converts foreign errors into [`AppError::InternalError`] with context.
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
