//! # Summarizer
//!
//! Compresses a history blob with one LLM call.
//!
//! The prompt template is rendered with `{text}` and `{char_limit}`; other
//! placeholders render empty. The model's reply is returned as-is: the limit is
//! advisory to the model and not enforced here. The call is bounded by an optional
//! timeout; a timeout or an LLM error is a [`SummarizeError`].

use llm_client::LlmClient;
use prompt::{render_vars, TemplateMode};
use std::sync::Arc;
use std::time::Duration;
use token_estimate::{CostEstimate, TokenEstimator};
use tracing::{debug, info, instrument, warn};

use crate::config::{DEFAULT_SUMMARIZE_TIMEOUT, DEFAULT_SUMMARY_PROMPT};
use crate::error::SummarizeError;
use crate::utils::truncate_for_log;

/// Compressed text and its estimated cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub text: String,
    pub estimate: CostEstimate,
}

pub struct Summarizer {
    llm: Arc<dyn LlmClient>,
    prompt_template: String,
    timeout: Option<Duration>,
    estimator: TokenEstimator,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            prompt_template: DEFAULT_SUMMARY_PROMPT.to_string(),
            timeout: Some(DEFAULT_SUMMARIZE_TIMEOUT),
            estimator: TokenEstimator::default(),
        }
    }

    pub fn with_prompt_template(mut self, prompt_template: impl Into<String>) -> Self {
        self.prompt_template = prompt_template.into();
        self
    }

    /// `None` disables the timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_estimator(mut self, estimator: TokenEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// The LLM's model id.
    pub fn model_id(&self) -> &str {
        self.llm.model_id()
    }

    /// Renders the summary prompt for `text` and `char_limit`.
    pub fn render_prompt(&self, text: &str, char_limit: usize) -> Result<String, SummarizeError> {
        let limit = char_limit.to_string();
        Ok(render_vars(
            &self.prompt_template,
            TemplateMode::Lenient,
            &[("text", text), ("char_limit", &limit)],
        )?)
    }

    /// Asks the LLM to rewrite `text` under `char_limit`. The returned estimate is
    /// computed for `model_id`.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn summarize(
        &self,
        text: &str,
        char_limit: usize,
        model_id: &str,
    ) -> Result<Summary, SummarizeError> {
        let prompt = self.render_prompt(text, char_limit)?;
        debug!(
            prompt_len = prompt.len(),
            prompt_preview = %truncate_for_log(&prompt, 200),
            "Summary prompt rendered"
        );

        let call = self.llm.complete(&prompt);
        let reply = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(reply) => reply,
                Err(_) => {
                    warn!(timeout = ?limit, "Summarization timed out");
                    return Err(SummarizeError::TimedOut(limit));
                }
            },
            None => call.await,
        };
        let summary = reply.map_err(|e| {
            warn!(error = %e, "Summarization call failed");
            SummarizeError::Unavailable(format!("{:#}", e))
        })?;

        let estimate = self.estimator.estimate(&summary, model_id);
        info!(
            summary_len = summary.len(),
            summary_cost = estimate.count,
            summary_preview = %truncate_for_log(&summary, 200),
            "Summarization completed"
        );
        Ok(Summary {
            text: summary,
            estimate,
        })
    }
}
