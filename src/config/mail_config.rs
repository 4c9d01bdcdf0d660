//! Transactional mail settings.

use std::env;

use super::env_opt;

/// Mail sender and relay configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// `From` header of every outgoing message
    pub from: String,
    /// HTTP endpoint of the mail relay. When unset, mails are only logged.
    pub relay_url: Option<String>,
    /// Bearer key for the relay
    pub relay_api_key: Option<String>,
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self {
            from: env::var("MAIL_FROM").unwrap_or_else(|_| "NextOne <no-reply@nextone.com>".to_string()),
            relay_url: env_opt("MAIL_RELAY_URL"),
            relay_api_key: env_opt("MAIL_RELAY_API_KEY"),
        }
    }
}
