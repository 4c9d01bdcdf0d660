//! HTTP handlers
//!
//! Handlers validate the request body, call one service method on
//! [`AppState`](crate::state::AppState) and serialize the result. Errors are returned as
//! [`AppError`](crate::errors::AppError) and rendered by the error envelope middleware.
//!
//! - [`auth`] - signup, login, two-factor challenge
//! - [`users`] - profile, two-factor toggles, user search
//! - [`search`] - generic entity search and lookup

pub mod auth;
pub mod search;
pub mod users;
