//! User profile and role checks
//!
//! Accounts are created by [`crate::services::auth::AuthService`]; this module only reads them.

pub mod user_service;

pub use user_service::*;
