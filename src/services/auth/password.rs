//! bcrypt helpers

use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult, ErrorContext};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const ACCOUNT_DEACTIVATED: &str = "Account is deactivated";

/// Hashes a plain password with the configured cost.
pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let start = std::time::Instant::now();
    let hashed = bcrypt::hash(password, cost).context("Failed to hash password")?;
    log::debug!("Password hashing took: {:?}", start.elapsed());
    Ok(hashed)
}

/// Checks `password` against the user's stored hash.
///
/// Accounts without a password (created through LinkedIn) never match.
///
/// # Errors
///
/// * `AppError::AuthenticationError` - `"Invalid credentials"`
pub fn verify_user_password(user: &User, password: &str) -> AppResult<()> {
    let Some(hash) = user.password.as_deref() else {
        return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
    };

    let valid = bcrypt::verify(password, hash).unwrap_or_else(|e| {
        log::warn!("Stored password hash for {} is unreadable: {}", user.email, e);
        false
    });

    if valid {
        Ok(())
    } else {
        Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()))
    }
}

/// Rejects deactivated accounts.
pub fn ensure_active(user: &User) -> AppResult<()> {
    if user.is_active {
        Ok(())
    } else {
        Err(AppError::AuthenticationError(ACCOUNT_DEACTIVATED.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::Role;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("Secr3t!pw", 4).unwrap();
        let user = User::new_local("a@example.com".into(), "A".into(), hash, Role::User);

        assert!(verify_user_password(&user, "Secr3t!pw").is_ok());
        assert!(matches!(
            verify_user_password(&user, "wrong"),
            Err(AppError::AuthenticationError(msg)) if msg == INVALID_CREDENTIALS
        ));
    }

    #[test]
    fn test_passwordless_account_never_matches() {
        let user = User::new_linkedin("li@example.com".into(), "Li".into(), "li-1".into());
        assert!(verify_user_password(&user, "").is_err());
    }

    #[test]
    fn test_corrupt_hash_is_rejected() {
        let user = User::new_local("a@example.com".into(), "A".into(), "not-a-hash".into(), Role::User);
        assert!(matches!(
            verify_user_password(&user, "anything"),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_deactivated_account_is_rejected() {
        let mut user = User::new_local("a@example.com".into(), "A".into(), "x".into(), Role::User);
        assert!(ensure_active(&user).is_ok());

        user.is_active = false;
        assert!(matches!(
            ensure_active(&user),
            Err(AppError::AuthenticationError(msg)) if msg == ACCOUNT_DEACTIVATED
        ));
    }
}
