//! Shared helpers
//!
//! # Modules
//!
//! - [`string_utils`] - trimming, email normalization, regex escaping
//! - [`bson_utils`] - BSON document to client JSON conversion

pub mod bson_utils;
pub mod string_utils;
