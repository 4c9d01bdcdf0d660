//! Database Connection Management Module
//!
//! Owns the MongoDB client (and therefore its connection pool). A single [`Database`] is
//! created at startup from [`DatabaseConfig`] and shared through the application state;
//! the pool is released when the last handle is dropped at shutdown.
//!
//! # Basic usage
//!
//! ```rust,ignore
//! let config = AppConfig::from_env();
//! let database = Database::connect(&config.database).await?;
//! let users = database.collection::<User>("users");
//! ```

use log::info;
use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client, Collection};

use crate::config::DatabaseConfig;

/// MongoDB connection wrapper
#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// Connects to MongoDB and verifies the connection with a `ping`.
    ///
    /// # Errors
    ///
    /// * `mongodb::error::Error` - invalid URI or unreachable server
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(&config.uri).await?;
        client_options.app_name = Some(config.app_name.clone());

        let client = Client::with_options(client_options)?;

        client
            .database(&config.database_name)
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB connected: {}", config.database_name);

        Ok(Self {
            client,
            database_name: config.database_name.clone(),
        })
    }

    /// Returns the configured `mongodb::Database`.
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// Typed handle to a collection of the configured database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.get_database().collection::<T>(name)
    }

    /// Handle whose client has not contacted a server yet. For tests that never query.
    #[cfg(test)]
    pub async fn unconnected(config: &DatabaseConfig) -> Self {
        let client = Client::with_uri_str(&config.uri)
            .await
            .expect("valid MongoDB URI");

        Self {
            client,
            database_name: config.database_name.clone(),
        }
    }
}
