use serde::{Deserialize, Serialize};

use crate::domain::entities::{Role, User};

/// User as returned to clients; never carries the password hash or the pending code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub two_factor_enabled: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let id = user.id_string().unwrap_or_default();
        let User {
            email,
            name,
            role,
            is_active,
            two_factor_enabled,
            ..
        } = user;

        Self {
            id,
            email,
            name,
            role,
            is_active,
            two_factor_enabled,
        }
    }
}
