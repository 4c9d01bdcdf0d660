//! Transactional email
//!
//! Sending is best effort: [`MailService::send_email`] reports failures in its
//! [`EmailResponse`] and logs them, and [`MailService::dispatch`] does not even wait for that.
//! No request fails because a mail could not be delivered.
//!
//! - [`mail_service`] - sending and fire-and-forget dispatch
//! - [`transport`] - the [`MailTransport`] seam, HTTP relay and log-only transports
//! - [`templates`] - two-factor code and student welcome messages

pub mod mail_service;
pub mod templates;
pub mod transport;

pub use mail_service::*;
pub use templates::*;
pub use transport::*;
