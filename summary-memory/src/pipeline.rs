//! # Summarization Pipeline
//!
//! Retrieve → format → estimate → (over budget) summarize, once per call.
//!
//! ## Outcomes
//!
//! | Condition | Status | Text |
//! |---|---|---|
//! | no records | `Empty` | configured placeholder |
//! | measured ≤ budget | `UnderBudget` | formatted history |
//! | over budget, summary ok | `Summarized` | LLM summary |
//! | over budget, summary failed | `SummarizationFailed` | formatted history |
//!
//! Store failures and strict-template failures are returned as [`PipelineError`].
//! A summary is never re-checked against the budget.
//!
//! ## Example
//!
//! ```rust,no_run
//! use llm_client::EnvLlmConfig;
//! use memory_core::RetrievalQuery;
//! use memory_inmemory::InMemoryMessageStore;
//! use std::sync::Arc;
//! use summary_memory::{SummarizationPipeline, SummaryMemoryConfig};
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let llm = Arc::new(EnvLlmConfig::from_env()?.build_client());
//! let pipeline = SummarizationPipeline::new(
//!     Arc::new(InMemoryMessageStore::new()),
//!     llm,
//!     SummaryMemoryConfig::default().with_character_limit(500),
//! );
//!
//! let result = pipeline.run(RetrievalQuery::for_session("chat-1")).await?;
//! println!("{}: {}", result.status, result.text);
//! # Ok(())
//! # }
//! ```

use llm_client::LlmClient;
use memory_core::{ExternalMemory, MessageStore, RetrievalQuery};
use prompt::HistoryFormatter;
use std::sync::Arc;
use token_estimate::TokenEstimator;
use tracing::{debug, info, instrument, warn};

use crate::config::{BudgetUnit, SummaryMemoryConfig};
use crate::error::PipelineError;
use crate::result::{PipelineResult, PipelineStatus};
use crate::retriever::{ExternalSource, HistoryRetriever};
use crate::summarizer::Summarizer;
use crate::utils::truncate_for_log;

pub struct SummarizationPipeline {
    retriever: HistoryRetriever,
    external_memory: Option<ExternalSource>,
    formatter: HistoryFormatter,
    estimator: TokenEstimator,
    summarizer: Summarizer,
    config: SummaryMemoryConfig,
}

impl SummarizationPipeline {
    /// Creates a pipeline reading from `store` and summarizing with `llm`.
    pub fn new(
        store: Arc<dyn MessageStore>,
        llm: Arc<dyn LlmClient>,
        config: SummaryMemoryConfig,
    ) -> Self {
        let retriever = HistoryRetriever::new(store).with_filter_stage(config.filter_stage);
        let formatter =
            HistoryFormatter::new(config.template.clone()).strict(config.strict_template);
        let summarizer = Summarizer::new(llm)
            .with_prompt_template(config.prompt_template.clone())
            .with_timeout(config.summarize_timeout);

        Self {
            retriever,
            external_memory: None,
            formatter,
            estimator: TokenEstimator::default(),
            summarizer,
            config,
        }
    }

    /// Reads history from `memory` instead of the primary store.
    pub fn with_external_memory(mut self, memory: Arc<dyn ExternalMemory>) -> Self {
        self.external_memory = Some(ExternalSource::new(memory));
        self
    }

    /// Replaces the estimator used for the history and the summary.
    pub fn with_estimator(mut self, estimator: TokenEstimator) -> Self {
        self.summarizer = self.summarizer.with_estimator(estimator.clone());
        self.estimator = estimator;
        self
    }

    pub fn config(&self) -> &SummaryMemoryConfig {
        &self.config
    }

    /// Model id used for estimation: the configured override, else the LLM's.
    pub fn model_id(&self) -> &str {
        self.config
            .model_id
            .as_deref()
            .unwrap_or_else(|| self.summarizer.model_id())
    }

    /// Runs one retrieve/format/estimate/summarize pass for `query`.
    #[instrument(skip(self), fields(model_id = %self.model_id(), budget = self.config.character_limit))]
    pub async fn run(&self, query: RetrievalQuery) -> Result<PipelineResult, PipelineError> {
        let query = query.resolve_session(self.config.default_session_id.as_deref());

        let records = self
            .retriever
            .retrieve(&query, self.external_memory.as_ref())
            .await?;
        if records.is_empty() {
            info!(session_id = %query.session_id, "No history found, skipping summarization");
            return Ok(PipelineResult::empty(self.config.empty_history_text.clone()));
        }

        let text = self.formatter.format(&records)?;
        let message_count = records.len();

        let model_id = self.model_id();
        let estimate = self.estimator.estimate(&text, model_id);
        let measured = match self.config.budget_unit {
            BudgetUnit::EstimatedCost => estimate.count,
            BudgetUnit::Characters => text.chars().count(),
        };
        info!(
            message_count,
            raw_bytes = text.len(),
            cost = %estimate,
            measured,
            unit = %self.config.budget_unit,
            "History formatted"
        );
        debug!(history_preview = %truncate_for_log(&text, 400), "Formatted history");

        if measured <= self.config.character_limit {
            return Ok(PipelineResult::unchanged(
                text,
                PipelineStatus::UnderBudget,
                message_count,
                estimate,
            ));
        }

        match self
            .summarizer
            .summarize(&text, self.config.character_limit, model_id)
            .await
        {
            Ok(summary) => {
                info!(
                    raw_bytes = text.len(),
                    compressed_bytes = summary.text.len(),
                    cost = %estimate,
                    summary_cost = %summary.estimate,
                    "History summarized"
                );
                Ok(PipelineResult {
                    raw_bytes: text.len(),
                    compressed_bytes: Some(summary.text.len()),
                    text: summary.text,
                    status: PipelineStatus::Summarized,
                    message_count,
                    estimate: Some(estimate),
                    summary_estimate: Some(summary.estimate),
                    diagnostic: None,
                })
            }
            Err(e) => {
                warn!(error = %e, "Summarization failed, returning unsummarized history");
                let mut result = PipelineResult::unchanged(
                    text,
                    PipelineStatus::SummarizationFailed,
                    message_count,
                    estimate,
                );
                result.diagnostic = Some(e.to_string());
                Ok(result)
            }
        }
    }
}
