//! SQLite connection pool wrapper for the storage crate.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

const IN_MEMORY_URLS: &[&str] = &[":memory:", "sqlite::memory:"];

/// Manages a single SQLite pool; creates the DB file if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for a file path, a `sqlite:` URL, or an in-memory database.
    ///
    /// In-memory databases are per-connection, so they get a single-connection pool.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!(database_url, "Initializing SQLite pool");

        let pool = if IN_MEMORY_URLS.contains(&database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
                .await?
        } else {
            let options = if database_url.starts_with("sqlite:") {
                SqliteConnectOptions::from_str(database_url)?
            } else {
                SqliteConnectOptions::new().filename(database_url)
            };
            SqlitePoolOptions::new()
                .connect_with(options.create_if_missing(true))
                .await?
        };

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
