//! Storage error types.
//!
//! Used by the repository and converted into `memory_core::StoreError` at the trait boundary.

use memory_core::StoreError;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(e) => StoreError::Unavailable(e.to_string()),
            StorageError::InvalidRecord(msg) => StoreError::InvalidRecord(msg),
        }
    }
}
