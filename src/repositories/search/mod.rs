pub mod search_repo;

pub use search_repo::*;
