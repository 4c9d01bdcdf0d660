//! Entity search and lookup over the aggregation builder.

pub mod search_service;

pub use search_service::*;
