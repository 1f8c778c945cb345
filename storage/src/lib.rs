//! Storage crate: SQLite persistence for chat history.
//!
//! [`MessageRepository`] implements `memory_core::MessageStore`: sender/session
//! filters, ordering by sequence position and the limit are all applied in SQL.
//!
//! ## Modules
//!
//! - `error` – Storage error types
//! - `models` – MessageRow (table row ↔ MessageRecord)
//! - `message_repo` – MessageRepository (SQLite)
//! - `sqlite_pool` – SqlitePoolManager

mod error;
mod message_repo;
mod models;
mod sqlite_pool;

pub use error::StorageError;
pub use message_repo::MessageRepository;
pub use models::MessageRow;
pub use sqlite_pool::SqlitePoolManager;
