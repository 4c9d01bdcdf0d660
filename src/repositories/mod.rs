//! Data access layer
//!
//! - [`users`] - the `users` collection behind the [`users::UserStore`] trait
//! - [`search`] - aggregation-backed search over every LMS collection
//!
//! Repositories are built once in `main` from the shared [`Database`](crate::db::Database)
//! and handed to services through `Arc`s.
//!
//! # Examples
//!
//! ```rust,ignore
//! let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(&database));
//! let user = users.find_by_email("user@example.com").await?;
//! ```

pub mod search;
pub mod users;
