//! # Authentication Configuration
//!
//! JWT signing and two-factor challenge settings.
//!
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_EXPIRY_HOURS="24"
//! export TWO_FACTOR_CODE_TTL_MINUTES="10"
//! ```

use std::env;

use super::env_or;

/// JSON Web Token settings
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Access token lifetime
    pub expiration_hours: i64,
}

impl JwtConfig {
    /// Reads `JWT_SECRET` and `JWT_EXPIRY_HOURS`.
    ///
    /// A missing secret falls back to a development value and logs a warning; never run
    /// production without setting it.
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "your-secret-key".to_string()
        });

        Self {
            secret,
            expiration_hours: env_or("JWT_EXPIRY_HOURS", 24),
        }
    }
}

/// Two-factor challenge settings
#[derive(Debug, Clone)]
pub struct TwoFactorConfig {
    /// Lifetime of an issued code
    pub code_ttl_minutes: i64,
}

const DEFAULT_CODE_TTL_MINUTES: i64 = 10;
const MAX_CODE_TTL_MINUTES: i64 = 24 * 60;

impl Default for TwoFactorConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: DEFAULT_CODE_TTL_MINUTES,
        }
    }
}

impl TwoFactorConfig {
    /// Reads `TWO_FACTOR_CODE_TTL_MINUTES`, accepted within `1..=1440`.
    pub fn from_env() -> Self {
        Self {
            code_ttl_minutes: checked_code_ttl(env_or(
                "TWO_FACTOR_CODE_TTL_MINUTES",
                DEFAULT_CODE_TTL_MINUTES,
            )),
        }
    }

    pub fn code_ttl_millis(&self) -> i64 {
        self.code_ttl_minutes * 60 * 1000
    }
}

fn checked_code_ttl(minutes: i64) -> i64 {
    if (1..=MAX_CODE_TTL_MINUTES).contains(&minutes) {
        minutes
    } else {
        log::error!(
            "TWO_FACTOR_CODE_TTL_MINUTES={} is outside 1..={}. Falling back to default",
            minutes,
            MAX_CODE_TTL_MINUTES
        );
        DEFAULT_CODE_TTL_MINUTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_code_ttl_is_ten_minutes() {
        let config = TwoFactorConfig::default();
        assert_eq!(config.code_ttl_minutes, 10);
        assert_eq!(config.code_ttl_millis(), 600_000);
    }

    #[test]
    fn test_code_ttl_out_of_range_falls_back() {
        assert_eq!(checked_code_ttl(5), 5);
        assert_eq!(checked_code_ttl(1_440), 1_440);
        assert_eq!(checked_code_ttl(0), 10);
        assert_eq!(checked_code_ttl(-3), 10);
        assert_eq!(checked_code_ttl(i64::MAX), 10);
    }
}
