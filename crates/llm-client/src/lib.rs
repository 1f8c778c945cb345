//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait (the language-model collaborator) and an OpenAI
//! implementation. Transport-agnostic; the summarizer in `summary-memory` only sees the trait.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};
use prompt::{ChatMessage, MessageRole};

mod config;
mod openai_llm;

pub use config::{EnvLlmConfig, LlmConfig};
pub use openai_llm::OpenAILlmClient;

/// LLM client interface: one completion for a list of messages.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier used for requests; also drives token estimation.
    fn model_id(&self) -> &str;

    /// Returns the model reply text for the given messages (system/user/assistant).
    async fn get_llm_response_with_messages(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Sends a single user prompt.
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.get_llm_response_with_messages(vec![ChatMessage::user(prompt)])
            .await
    }
}

/// Converts a single [`ChatMessage`] into OpenAI API message format.
fn chat_message_to_openai(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let content = msg.content.clone();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(openai_msg)
}
