//! Domain layer: persisted entities, request/response DTOs and auth models.
//!
//! # Layout
//!
//! - [`entities`] - documents stored in MongoDB (`User`)
//! - [`dto`] - HTTP request and response bodies, including [`dto::search::SearchOptions`]
//! - [`models`] - values that live only in memory (token claims, authenticated user)

pub mod dto;
pub mod entities;
pub mod models;

pub use dto::*;
pub use entities::*;
pub use models::*;
