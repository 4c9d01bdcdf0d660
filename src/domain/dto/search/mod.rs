//! Search request/response shapes shared by every `POST /<entity>/search` endpoint.

pub mod pagination;
pub mod search_options;

pub use pagination::*;
pub use search_options::*;
