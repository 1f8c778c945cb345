//! OpenAI implementation of [`LlmClient`]: wraps openai-client and prepends an optional system message.

use anyhow::Result;
use async_trait::async_trait;
use prompt::ChatMessage;
use tracing::instrument;

use super::{chat_message_to_openai, LlmClient};

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// LlmClient backed by openai-client.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
    system_prompt: Option<String>,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self::from_client(openai_client::OpenAIClient::new(api_key))
    }

    pub fn from_client(client: openai_client::OpenAIClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt_opt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, messages), fields(model = %self.model, message_count = messages.len()))]
    async fn get_llm_response_with_messages(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let mut openai_messages = Vec::with_capacity(messages.len() + 1);
        if let Some(ref system) = self.system_prompt {
            openai_messages.push(chat_message_to_openai(&ChatMessage::system(system.as_str()))?);
        }
        for msg in &messages {
            openai_messages.push(chat_message_to_openai(msg)?);
        }
        self.client.chat_completion(&self.model, openai_messages).await
    }
}
