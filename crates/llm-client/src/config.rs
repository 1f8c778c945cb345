//! LLM configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

use crate::openai_llm::{OpenAILlmClient, DEFAULT_MODEL};

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn system_prompt(&self) -> Option<&str>;
    fn temperature(&self) -> Option<f32>;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_system_prompt: Option<String>,
    pub llm_temperature: Option<f32>,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.openai_api_key
    }
    fn base_url(&self) -> &str {
        &self.openai_base_url
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
    fn system_prompt(&self) -> Option<&str> {
        self.llm_system_prompt.as_deref()
    }
    fn temperature(&self) -> Option<f32> {
        self.llm_temperature
    }
}

impl EnvLlmConfig {
    /// Load from environment variables: OPENAI_API_KEY (required), OPENAI_BASE_URL,
    /// MODEL, LLM_SYSTEM_PROMPT, LLM_TEMPERATURE.
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let llm_model = env::var("MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let llm_system_prompt = env::var("LLM_SYSTEM_PROMPT")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let llm_temperature = match env::var("LLM_TEMPERATURE") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<f32>()
                    .with_context(|| format!("LLM_TEMPERATURE is not a number: {}", raw))?,
            ),
            Err(_) => None,
        };
        Ok(Self {
            openai_api_key,
            openai_base_url,
            llm_model,
            llm_system_prompt,
            llm_temperature,
        })
    }

    /// Builds the OpenAI client described by this config.
    pub fn build_client(&self) -> OpenAILlmClient {
        let mut client = openai_client::OpenAIClient::with_base_url(
            self.openai_api_key.clone(),
            self.openai_base_url.clone(),
        );
        if let Some(temperature) = self.llm_temperature {
            client = client.with_temperature(temperature);
        }
        OpenAILlmClient::from_client(client)
            .with_model(self.llm_model.clone())
            .with_system_prompt_opt(self.llm_system_prompt.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LlmClient;

    #[test]
    fn test_build_client_uses_configured_model() {
        let config = EnvLlmConfig {
            openai_api_key: "sk-test-key-000000".to_string(),
            openai_base_url: "http://localhost:8080/v1".to_string(),
            llm_model: "claude-3-haiku".to_string(),
            llm_system_prompt: Some("Summarize faithfully.".to_string()),
            llm_temperature: Some(0.0),
        };
        let client = config.build_client();
        assert_eq!(client.model_id(), "claude-3-haiku");
        assert_eq!(client.system_prompt(), Some("Summarize faithfully."));
        assert_eq!(config.temperature(), Some(0.0));
    }
}
