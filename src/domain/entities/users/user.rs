//! User Entity Implementation
//!
//! A user account as stored in the `users` collection. Field names are camelCase to stay
//! compatible with existing documents.
//!
//! The pending two-factor challenge is embedded on the record as two nullable fields,
//! `twoFactorCode` and `twoFactorCodeExpires`. They are only ever read through
//! [`User::pending_challenge`] and only ever written together (see
//! `repositories::users::ChallengeUpdate`), so one can never be set without the other.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    OrgAdmin,
    #[default]
    User,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::OrgAdmin => "org_admin",
            Role::User => "user",
            Role::Student => "student",
        }
    }
}

/// A pending two-factor challenge
#[derive(Debug, Clone, PartialEq)]
pub struct TwoFactorChallenge {
    /// Six-digit, zero-padded code
    pub code: String,
    pub expires_at: DateTime,
}

impl TwoFactorChallenge {
    /// A challenge is expired once `now` is strictly past its expiry.
    pub fn is_expired_at(&self, now: DateTime) -> bool {
        now > self.expires_at
    }

    /// Exact string comparison, no normalization.
    pub fn matches(&self, code: &str) -> bool {
        self.code == code
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Unique, stored lowercase
    pub email: String,
    /// bcrypt hash. `None` for accounts created through LinkedIn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub two_factor_enabled: bool,
    #[serde(default)]
    pub(crate) two_factor_code: Option<String>,
    #[serde(default)]
    pub(crate) two_factor_code_expires: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_id: Option<String>,
    #[serde(default = "DateTime::now")]
    pub created_at: DateTime,
    #[serde(default = "DateTime::now")]
    pub updated_at: DateTime,
}

fn default_active() -> bool {
    true
}

impl User {
    /// New password account.
    pub fn new_local(email: String, name: String, password_hash: String, role: Role) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            password: Some(password_hash),
            name,
            is_active: true,
            role,
            two_factor_enabled: false,
            two_factor_code: None,
            two_factor_code_expires: None,
            linkedin_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// New active student created from a LinkedIn profile; it has no password.
    pub fn new_linkedin(email: String, name: String, linkedin_id: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            password: None,
            name,
            is_active: true,
            role: Role::Student,
            two_factor_enabled: false,
            two_factor_code: None,
            two_factor_code_expires: None,
            linkedin_id: Some(linkedin_id),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// The pending challenge, present only when both code and expiry are stored.
    pub fn pending_challenge(&self) -> Option<TwoFactorChallenge> {
        match (&self.two_factor_code, self.two_factor_code_expires) {
            (Some(code), Some(expires_at)) => Some(TwoFactorChallenge {
                code: code.clone(),
                expires_at,
            }),
            _ => None,
        }
    }

    pub(crate) fn set_challenge(&mut self, challenge: Option<TwoFactorChallenge>) {
        match challenge {
            Some(c) => {
                self.two_factor_code = Some(c.code);
                self.two_factor_code_expires = Some(c.expires_at);
            }
            None => {
                self.two_factor_code = None;
                self.two_factor_code_expires = None;
            }
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
