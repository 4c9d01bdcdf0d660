//! Data transfer objects exchanged over HTTP.

pub mod auth;
pub mod search;
pub mod users;

pub use auth::*;
pub use search::*;
pub use users::*;
