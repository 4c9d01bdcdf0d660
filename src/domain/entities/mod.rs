//! Persisted entities.

pub mod users;

pub use users::*;
