//! # Message Sources
//!
//! Collaborator interfaces the retriever reads history from.
//!
//! - `MessageStore` is the primary store: it applies filter, order and limit natively.
//! - `ExternalMemory` is a simpler chat history: a mutable session id and the full
//!   message list for that session in ascending order, with no filtering support.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{ExternalMessage, MessageRecord, NewMessage, RetrievalQuery};

/// Primary message store, queried by filter/order/limit.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Returns messages matching `query`, already filtered, ordered and limited.
    ///
    /// An empty `query.session_id` means "all sessions". No match is `Ok(vec![])`.
    async fn get_messages(&self, query: &RetrievalQuery) -> Result<Vec<MessageRecord>, StoreError>;

    /// Appends a message; the store assigns its sequence position.
    async fn add(&self, message: NewMessage) -> Result<MessageRecord, StoreError>;
}

/// External chat history with session-scoped, unfiltered reads.
#[async_trait]
pub trait ExternalMemory: Send + Sync {
    /// Points the memory at another session.
    async fn set_session_id(&self, session_id: &str);

    /// The session currently read by `messages`.
    async fn session_id(&self) -> String;

    /// All messages of the current session, oldest first.
    async fn messages(&self) -> Result<Vec<ExternalMessage>, StoreError>;

    /// Appends a message to the current session.
    async fn add_message(&self, message: ExternalMessage) -> Result<(), StoreError>;
}
