//! Service layer
//!
//! Services are built once in `main` from [`crate::config::AppConfig`] and shared through
//! [`crate::state::AppState`]. Storage is injected as `Arc<dyn UserStore>` so every service
//! can be tested against the in-memory store.
//!
//! - [`auth`] - login, signup, tokens and the two-factor challenge
//! - [`mail`] - transactional email
//! - [`users`] - profile and role checks
//! - [`search`] - entity search and lookup

pub mod auth;
pub mod mail;
pub mod search;
pub mod users;
