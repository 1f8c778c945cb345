//! In-memory primary message store.

use async_trait::async_trait;
use chrono::Utc;
use memory_core::{MessageRecord, MessageStore, NewMessage, RetrievalQuery, SortOrder, StoreError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// In-memory `MessageStore`. Records are kept in insertion order, which is also
/// sequence-position order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageStore {
    records: Arc<RwLock<Vec<MessageRecord>>>,
}

impl InMemoryMessageStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `records`, sorted by sequence position.
    pub fn from_records(mut records: Vec<MessageRecord>) -> Self {
        records.sort_by_key(|r| r.sequence_position());
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Returns the number of records across all sessions.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Removes every record.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn get_messages(&self, query: &RetrievalQuery) -> Result<Vec<MessageRecord>, StoreError> {
        let records = self.records.read().await;
        let mut selected: Vec<MessageRecord> = records
            .iter()
            .filter(|r| query.session_id.is_empty() || r.session_id() == query.session_id)
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        drop(records);

        if query.order == SortOrder::Descending {
            selected.reverse();
        }
        if let Some(limit) = query.effective_limit() {
            selected.truncate(limit);
        }

        debug!(
            session_id = %query.session_id,
            order = ?query.order,
            limit = query.limit,
            count = selected.len(),
            "In-memory message store get_messages returned"
        );
        Ok(selected)
    }

    async fn add(&self, message: NewMessage) -> Result<MessageRecord, StoreError> {
        let mut records = self.records.write().await;
        let position = records
            .last()
            .map(|r| r.sequence_position() + 1)
            .unwrap_or(1);
        let record = message.into_record(position, Utc::now());
        records.push(record.clone());
        drop(records);

        info!(
            session_id = %record.session_id(),
            sender_type = %record.sender_type(),
            sequence_position = position,
            "Message written to in-memory store"
        );
        Ok(record)
    }
}
