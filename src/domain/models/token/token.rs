//! JWT claims
use serde::{Deserialize, Serialize};

/// Access token payload
///
/// - `sub`: user id (hex ObjectId)
/// - `email`: user email
/// - `iat` / `exp`: Unix timestamps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}
