//! # User Repository
//!
//! MongoDB implementation of [`UserStore`] over the `users` collection.
//!
//! ## Indexes
//!
//! | name | keys | options |
//! |------|------|---------|
//! | `email_unique` | `email: 1` | unique |
//! | `linkedin_id_unique` | `linkedinId: 1` | unique, sparse |
//! | `created_at_desc` | `createdAt: -1` | |
//!
//! Reads always hit the database. A cached user would serve a stale two-factor challenge.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::db::Database;
use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult};

use super::{ChallengeUpdate, TwoFactorUpdate, UserStore};

pub const USERS_COLLECTION: &str = "users";

const DUPLICATE_KEY_CODE: i32 = 11000;

/// `users` collection access
#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection::<User>(USERS_COLLECTION),
        }
    }

    /// Creates the collection indexes. Run once at startup.
    ///
    /// # Errors
    ///
    /// * `AppError::DatabaseError` - index creation failed, e.g. existing duplicate emails
    pub async fn create_indexes(&self) -> AppResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        let linkedin_index = IndexModel::builder()
            .keys(doc! { "linkedinId": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .sparse(true)
                    .name("linkedin_id_unique".to_string())
                    .build(),
            )
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(IndexOptions::builder().name("created_at_desc".to_string()).build())
            .build();

        self.collection
            .create_indexes([email_index, linkedin_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

/// `$set` document for a two-factor update. `updatedAt` is always refreshed.
pub(crate) fn two_factor_set_document(update: &TwoFactorUpdate, now: DateTime) -> Document {
    let mut set = doc! { "updatedAt": now };

    if let Some(enabled) = update.enabled {
        set.insert("twoFactorEnabled", enabled);
    }

    match &update.challenge {
        ChallengeUpdate::Keep => {}
        ChallengeUpdate::Set { code, expires_at } => {
            set.insert("twoFactorCode", code.as_str());
            set.insert("twoFactorCodeExpires", *expires_at);
        }
        ChallengeUpdate::Clear => {
            set.insert("twoFactorCode", Bson::Null);
            set.insert("twoFactorCodeExpires", Bson::Null);
        }
    }

    set
}

fn parse_object_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::ValidationError("Invalid id format".to_string()))
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        &*error.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = parse_object_id(id)?;

        self.collection
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn insert(&self, mut user: User) -> AppResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError(format!(
                "User with email {} already exists",
                user.email
            )));
        }

        // The unique index still catches a concurrent signup with the same email.
        let result = self.collection.insert_one(&user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::ConflictError(format!("User with email {} already exists", user.email))
            } else {
                AppError::DatabaseError(e.to_string())
            }
        })?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::InternalError("Inserted user has no ObjectId".to_string()))?;
        user.id = Some(id);

        Ok(user)
    }

    async fn update_two_factor(&self, id: &str, update: TwoFactorUpdate) -> AppResult<Option<User>> {
        let object_id = parse_object_id(id)?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": two_factor_set_document(&update, DateTime::now()) },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}
