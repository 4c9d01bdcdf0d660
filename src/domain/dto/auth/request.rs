//! Authentication request DTOs
//!
//! Bodies of the `/auth/*` endpoints. Every struct derives [`Validate`]; handlers call
//! `validate()` before touching a service.
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::Role;

/// `POST /auth/login`
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `POST /auth/signup`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    /// Defaults to `user`. `super_admin` can not be self-assigned.
    #[serde(default)]
    #[validate(custom(function = "validate_signup_role"))]
    pub role: Option<Role>,
}

/// `POST /auth/request-2fa`
#[derive(Debug, Deserialize, Validate)]
pub struct Request2faRequest {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `POST /auth/verify-2fa`
#[derive(Debug, Deserialize, Validate)]
pub struct Verify2faRequest {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,
}

/// Lowercase, uppercase, digit and symbol are all required.
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if !(has_lowercase && has_uppercase && has_digit && has_symbol) {
        return Err(ValidationError::new("weak_password").with_message(
            "Password must contain uppercase, lowercase, number and special character".into(),
        ));
    }

    Ok(())
}

fn validate_signup_role(role: &Role) -> Result<(), ValidationError> {
    if *role == Role::SuperAdmin {
        return Err(ValidationError::new("forbidden_role")
            .with_message("Role super_admin can not be assigned at signup".into()));
    }
    Ok(())
}
