//! In-memory external chat history.

use async_trait::async_trait;
use memory_core::{ExternalMemory, ExternalMessage, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Session-keyed chat history implementing `ExternalMemory`.
///
/// `messages()` returns the current session's messages in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatHistory {
    session_id: Arc<RwLock<String>>,
    sessions: Arc<RwLock<HashMap<String, Vec<ExternalMessage>>>>,
}

impl InMemoryChatHistory {
    /// Creates an empty history pointed at `session_id`.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Arc::new(RwLock::new(session_id.into())),
            sessions: Arc::default(),
        }
    }

    /// Appends messages to a given session without touching the current session id.
    pub async fn extend_session(
        &self,
        session_id: &str,
        messages: impl IntoIterator<Item = ExternalMessage>,
    ) {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .extend(messages);
    }
}

#[async_trait]
impl ExternalMemory for InMemoryChatHistory {
    async fn set_session_id(&self, session_id: &str) {
        *self.session_id.write().await = session_id.to_string();
    }

    async fn session_id(&self) -> String {
        self.session_id.read().await.clone()
    }

    async fn messages(&self) -> Result<Vec<ExternalMessage>, StoreError> {
        let session_id = self.session_id().await;
        let sessions = self.sessions.read().await;
        let messages = sessions.get(&session_id).cloned().unwrap_or_default();
        debug!(
            session_id = %session_id,
            count = messages.len(),
            "In-memory chat history read"
        );
        Ok(messages)
    }

    async fn add_message(&self, message: ExternalMessage) -> Result<(), StoreError> {
        let session_id = self.session_id().await;
        self.extend_session(&session_id, [message]).await;
        Ok(())
    }
}
