//! Shared mocks for summary-memory integration tests.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use llm_client::LlmClient;
use memory_core::{
    ExternalMemory, ExternalMessage, MessageRecord, MessageStore, NewMessage, RetrievalQuery,
    SenderType, StoreError,
};
use memory_inmemory::InMemoryMessageStore;
use prompt::ChatMessage;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted LLM: fixed reply, error, or a reply after a delay. Counts calls.
pub struct MockLlm {
    model_id: String,
    reply: Result<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    pub fn replying(model_id: &str, reply: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            reply: Ok(reply.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(model_id: &str, error: &str) -> Self {
        Self {
            reply: Err(error.to_string()),
            ..Self::replying(model_id, "")
        }
    }

    pub fn slow(model_id: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::replying(model_id, "late summary")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn get_llm_response_with_messages(&self, messages: Vec<ChatMessage>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = messages
            .iter()
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone().map_err(|e| anyhow::anyhow!(e))
    }
}

/// Store that cannot be reached.
pub struct UnavailableStore;

#[async_trait]
impl MessageStore for UnavailableStore {
    async fn get_messages(&self, _query: &RetrievalQuery) -> Result<Vec<MessageRecord>, StoreError> {
        Err(StoreError::Unavailable("database is locked".to_string()))
    }

    async fn add(&self, _message: NewMessage) -> Result<MessageRecord, StoreError> {
        Err(StoreError::Unavailable("database is locked".to_string()))
    }
}

/// In-memory store with `turns` appended to `session_id`, alternating user/AI
/// starting with the user. Users are named `alice`, the AI `bot`.
pub async fn store_with_turns(session_id: &str, turns: &[&str]) -> InMemoryMessageStore {
    let store = InMemoryMessageStore::new();
    for (i, text) in turns.iter().enumerate() {
        let (sender_type, name) = if i % 2 == 0 {
            (SenderType::User, "alice")
        } else {
            (SenderType::Ai, "bot")
        };
        store
            .add(NewMessage::new(session_id, sender_type, *text).with_sender_name(name))
            .await
            .unwrap();
    }
    store
}

/// External memory that yields to the scheduler inside every call, so concurrent
/// readers interleave between switching the session and reading it.
pub struct YieldingMemory {
    current: Mutex<String>,
    sessions: HashMap<String, Vec<ExternalMessage>>,
}

impl YieldingMemory {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(String::new()),
            sessions: HashMap::new(),
        }
    }

    /// Adds `session_id` holding `turns` as user messages, oldest first.
    pub fn with_session(mut self, session_id: &str, turns: &[&str]) -> Self {
        let messages = turns.iter().map(|t| ExternalMessage::user(*t)).collect();
        self.sessions.insert(session_id.to_string(), messages);
        self
    }
}

#[async_trait]
impl ExternalMemory for YieldingMemory {
    async fn set_session_id(&self, session_id: &str) {
        tokio::task::yield_now().await;
        *self.current.lock().unwrap() = session_id.to_string();
        tokio::task::yield_now().await;
    }

    async fn session_id(&self) -> String {
        tokio::task::yield_now().await;
        self.current.lock().unwrap().clone()
    }

    async fn messages(&self) -> Result<Vec<ExternalMessage>, StoreError> {
        tokio::task::yield_now().await;
        let current = self.current.lock().unwrap().clone();
        Ok(self.sessions.get(&current).cloned().unwrap_or_default())
    }

    async fn add_message(&self, _message: ExternalMessage) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only memory".to_string()))
    }
}
