//! # History Retriever
//!
//! Fetches the window of chat turns a pipeline run works on.
//!
//! Two sources:
//!
//! - the primary [`MessageStore`], which applies sender filters, session scoping,
//!   ordering and the limit natively;
//! - an optional [`ExternalMemory`], wrapped in an [`ExternalSource`], which only
//!   returns a session's full ascending list. The retriever points it at the query's
//!   session and applies order, limit and sender filters itself, in the order chosen
//!   by [`FilterStage`].
//!
//! An empty result is not an error. Store failures are returned as [`StoreError`]
//! and not retried.

use memory_core::{
    ExternalMemory, ExternalMessage, MessageRecord, MessageStore, RetrievalQuery, SortOrder,
    StoreError,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::config::FilterStage;

/// An [`ExternalMemory`] shared by concurrent runs.
///
/// The memory reads whatever session it currently points at, so switching the session
/// and reading its messages happen under one lock. Runs for different sessions never
/// see each other's history as long as they go through the same source.
pub struct ExternalSource {
    memory: Arc<dyn ExternalMemory>,
    session_lock: Mutex<()>,
}

impl ExternalSource {
    pub fn new(memory: Arc<dyn ExternalMemory>) -> Self {
        Self {
            memory,
            session_lock: Mutex::new(()),
        }
    }

    /// Points the memory at `session_id` when non-empty and returns the session read
    /// together with its messages.
    async fn read_session(
        &self,
        session_id: &str,
    ) -> Result<(String, Vec<ExternalMessage>), StoreError> {
        let _guard = self.session_lock.lock().await;
        if !session_id.is_empty() {
            self.memory.set_session_id(session_id).await;
        }
        let current = self.memory.session_id().await;
        let messages = self.memory.messages().await?;
        Ok((current, messages))
    }
}

pub struct HistoryRetriever {
    store: Arc<dyn MessageStore>,
    filter_stage: FilterStage,
}

impl HistoryRetriever {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            store,
            filter_stage: FilterStage::default(),
        }
    }

    /// Sets when sender filters run on the external-memory path.
    pub fn with_filter_stage(mut self, stage: FilterStage) -> Self {
        self.filter_stage = stage;
        self
    }

    pub fn filter_stage(&self) -> FilterStage {
        self.filter_stage
    }

    /// Returns the records selected by `query`, from `external_memory` when given,
    /// otherwise from the primary store.
    #[instrument(
        skip(self, query, external_memory),
        fields(
            session_id = %query.session_id,
            limit = query.limit,
            order = ?query.order,
            external = external_memory.is_some()
        )
    )]
    pub async fn retrieve(
        &self,
        query: &RetrievalQuery,
        external_memory: Option<&ExternalSource>,
    ) -> Result<Vec<MessageRecord>, StoreError> {
        let records = match external_memory {
            Some(memory) => retrieve_from_external(memory, query, self.filter_stage).await?,
            None => self.store.get_messages(query).await?,
        };

        info!(count = records.len(), "Retrieved history");
        Ok(records)
    }
}

/// Applies `query` to an external memory's ascending message list.
///
/// Positions are 1-based indexes into that list, so they stay ascending-by-occurrence
/// whatever the requested order. A non-empty `query.session_id` replaces the memory's
/// current session first.
pub async fn retrieve_from_external(
    source: &ExternalSource,
    query: &RetrievalQuery,
    stage: FilterStage,
) -> Result<Vec<MessageRecord>, StoreError> {
    let (session_id, stored) = source.read_session(&query.session_id).await?;
    debug!(session_id = %session_id, stored = stored.len(), ?stage, "Read external memory");

    let mut records: Vec<MessageRecord> = stored
        .into_iter()
        .enumerate()
        .map(|(idx, message)| message.into_record(&session_id, idx as u64 + 1))
        .collect();

    if stage == FilterStage::BeforeLimit {
        records.retain(|r| query.matches(r));
    }
    if query.order == SortOrder::Descending {
        records.reverse();
    }
    if let Some(limit) = query.effective_limit() {
        records.truncate(limit);
    }
    if stage == FilterStage::AfterLimit {
        records.retain(|r| query.matches(r));
    }

    Ok(records)
}
