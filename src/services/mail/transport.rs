//! Mail transports
//!
//! [`HttpMailTransport`] posts the message as JSON to a mail relay; [`LogMailTransport`] only
//! logs it and is selected when no relay is configured (local development).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::MailConfig;
use crate::errors::{AppError, AppResult};

use super::mail_service::EmailRequest;

/// Delivers one message
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, email: &EmailRequest) -> AppResult<()>;
}

/// JSON POST to a mail relay
pub struct HttpMailTransport {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpMailTransport {
    pub fn new(url: String, api_key: Option<String>) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent("nextone-lms-backend")
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build mail client: {}", e)))?;

        Ok(Self { client, url, api_key })
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn deliver(&self, email: &EmailRequest) -> AppResult<()> {
        let mut request = self.client.post(&self.url).json(email);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Mail relay request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Mail relay rejected message ({}): {}",
                status, body
            )));
        }

        Ok(())
    }
}

/// Logs instead of sending
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn deliver(&self, email: &EmailRequest) -> AppResult<()> {
        log::info!(
            "📧 Mail relay not configured, logging mail to {} ({})",
            email.to,
            email.subject
        );
        log::debug!("{}", email.html);
        Ok(())
    }
}

/// Relay transport when `MAIL_RELAY_URL` is set, log-only otherwise.
pub fn transport_from_config(config: &MailConfig) -> AppResult<Arc<dyn MailTransport>> {
    match &config.relay_url {
        Some(url) => Ok(Arc::new(HttpMailTransport::new(
            url.clone(),
            config.relay_api_key.clone(),
        )?)),
        None => {
            log::warn!("MAIL_RELAY_URL not set, outgoing mail will only be logged");
            Ok(Arc::new(LogMailTransport))
        }
    }
}
