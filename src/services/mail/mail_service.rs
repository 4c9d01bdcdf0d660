//! # Mail Service

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::transport::MailTransport;

/// Outgoing message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailRequest {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Success,
    Failed,
}

/// Outcome of a send
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailResponse {
    pub status: EmailStatus,
    pub error: Option<String>,
}

/// Sends transactional mail through a [`MailTransport`]
///
/// Every message goes out with the configured sender address, whatever `from` the caller set.
#[derive(Clone)]
pub struct MailService {
    transport: Arc<dyn MailTransport>,
    from: String,
}

impl MailService {
    pub fn new(transport: Arc<dyn MailTransport>, from: String) -> Self {
        Self { transport, from }
    }

    /// Sends and reports the outcome. Never fails; errors are logged.
    pub async fn send_email(&self, mut email: EmailRequest) -> EmailResponse {
        email.from = self.from.clone();

        match self.transport.deliver(&email).await {
            Ok(()) => {
                log::info!("Mail sent to {} ({})", email.to, email.subject);
                EmailResponse {
                    status: EmailStatus::Success,
                    error: None,
                }
            }
            Err(e) => {
                log::error!("Failed to send mail to {}: {}", email.to, e);
                EmailResponse {
                    status: EmailStatus::Failed,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Sends in the background and returns immediately.
    pub fn dispatch(&self, email: EmailRequest) {
        let service = self.clone();
        actix_web::rt::spawn(async move {
            service.send_email(email).await;
        });
    }
}
