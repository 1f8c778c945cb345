//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for non-streaming chat completion.
//! Provides token masking for safe logging and a simple request/response API.

use async_openai::{config::OpenAIConfig, types::CreateChatCompletionRequestArgs, Client};
use std::sync::Arc;

pub use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};

/// Masks an API key/token for safe logging: first 7 chars + "***" + last 4 chars.
/// Keys of 11 chars or fewer return "***" so no segment leaks.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// OpenAI chat client. Wraps the async-openai client and keeps the API key for masked logging.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<OpenAIConfig>>,
    /// API key stored only for logging (masked).
    api_key_for_logging: String,
    temperature: Option<f32>,
}

impl OpenAIClient {
    /// Builds a client using the given API key and default API base URL.
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.clone());
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging: api_key,
            temperature: None,
        }
    }

    /// Builds a client with a custom base URL (proxies or OpenAI-compatible endpoints).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.clone())
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging: api_key,
            temperature: None,
        }
    }

    /// Sampling temperature sent with every request. Unset leaves the API default.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn masked_key(&self) -> String {
        mask_token(&self.api_key_for_logging)
    }

    /// Sends a chat completion request and returns the first choice's content.
    ///
    /// Logs the masked API key and token usage; the request body is logged at debug.
    /// Errors when the response has no choices.
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> anyhow::Result<String> {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            api_key = %self.masked_key(),
            "OpenAI chat_completion request"
        );

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(model).messages(messages);
        if let Some(temperature) = self.temperature {
            args.temperature(temperature);
        }
        let request = args.build()?;

        if let Ok(json) = serde_json::to_string_pretty(&request) {
            tracing::debug!(request_json = %json, "OpenAI chat_completion request JSON");
        }

        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "OpenAI chat_completion usage"
            );
        }

        match response.choices.first() {
            Some(choice) => Ok(choice.message.content.clone().unwrap_or_default()),
            None => anyhow::bail!("No response from OpenAI"),
        }
    }
}
