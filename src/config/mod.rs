//! # Configuration Module
//!
//! Environment-driven configuration for the service. All values are read once at startup
//! by [`AppConfig::from_env`] and handed to constructors explicitly; nothing reads the
//! environment after boot.
//!
//! ## Modules
//!
//! - [`data_config`] - environment, server, database, password and rate-limit settings
//! - [`auth_config`] - JWT and two-factor settings
//! - [`mail_config`] - sender address and mail relay
//!
//! ## Environment variables
//!
//! ```bash
//! # server
//! export HOST="0.0.0.0"
//! export PORT="3000"
//! export GLOBAL_PREFIX=""
//!
//! # database
//! export MONGO_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="nextone"
//!
//! # auth
//! export JWT_SECRET="change-me"
//! export JWT_EXPIRY_HOURS="24"
//! export TWO_FACTOR_CODE_TTL_MINUTES="10"
//!
//! # mail
//! export MAIL_FROM="NextOne <no-reply@nextone.com>"
//! export MAIL_RELAY_URL="https://mail-relay.internal/send"
//! export MAIL_RELAY_API_KEY="..."
//! ```

pub mod auth_config;
pub mod data_config;
pub mod mail_config;

pub use auth_config::*;
pub use data_config::*;
pub use mail_config::*;

use std::env;
use std::str::FromStr;

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub password: PasswordConfig,
    pub rate_limit: RateLimitConfig,
    pub jwt: JwtConfig,
    pub two_factor: TwoFactorConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    /// Reads the whole configuration from the process environment.
    pub fn from_env() -> Self {
        let environment = Environment::current();

        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            password: PasswordConfig::from_env(&environment),
            rate_limit: RateLimitConfig::from_env(),
            jwt: JwtConfig::from_env(),
            two_factor: TwoFactorConfig::from_env(),
            mail: MailConfig::from_env(),
            environment,
        }
    }
}

/// Reads `key` and parses it, falling back to `default` when unset or malformed.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse::<T>().unwrap_or_else(|e| {
            log::error!("{} parse failed: {}. Falling back to default", key, e);
            default
        }),
        Err(_) => default,
    }
}

/// Reads an optional string, treating blank values as unset.
pub(crate) fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
