//! Error types for message stores and model parsing.

use thiserror::Error;

/// Errors a message store or external memory can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store cannot be reached or failed the query.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// A stored row could not be turned into a `MessageRecord`.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Errors parsing user-facing labels into model enums.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown sender type: {0}")]
    SenderType(String),
    #[error("Unknown sort order: {0}")]
    SortOrder(String),
}
