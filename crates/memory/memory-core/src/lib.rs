//! # Memory Core
//!
//! Core types and traits for chat history retrieval.
//! Used by the store crates (`storage`, `memory-inmemory`) and by `summary-memory`.
//!
//! ## Modules
//!
//! - [`types`] - SenderType, SortOrder, RetrievalQuery, MessageRecord, NewMessage, ExternalMessage
//! - [`store`] - MessageStore and ExternalMemory traits
//! - [`error`] - StoreError, ParseError

pub mod error;
pub mod store;
pub mod types;

pub use error::*;
pub use store::*;
pub use types::*;
