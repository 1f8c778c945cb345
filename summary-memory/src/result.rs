//! Pipeline output.

use serde::Serialize;
use std::fmt;
use token_estimate::CostEstimate;

/// How a pipeline run finished.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// No records matched; the text is the configured placeholder.
    Empty,
    /// Within budget; the text is the formatted history unchanged.
    UnderBudget,
    /// Over budget; the text is the LLM's summary.
    Summarized,
    /// Over budget but the summarizer failed; the text is the formatted history unchanged.
    SummarizationFailed,
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStatus::Empty => "empty",
            PipelineStatus::UnderBudget => "under_budget",
            PipelineStatus::Summarized => "summarized",
            PipelineStatus::SummarizationFailed => "summarization_failed",
        };
        f.write_str(name)
    }
}

/// Result of one pipeline run. Built fresh per call; nothing is shared across runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub text: String,
    pub status: PipelineStatus,
    pub message_count: usize,
    /// Byte length of the formatted history (0 when empty).
    pub raw_bytes: usize,
    /// Byte length of the summary, when one was produced.
    pub compressed_bytes: Option<usize>,
    /// Estimate of the formatted history.
    pub estimate: Option<CostEstimate>,
    /// Estimate of the summary, for observability only.
    pub summary_estimate: Option<CostEstimate>,
    /// Why summarization did not happen, when it failed.
    pub diagnostic: Option<String>,
}

impl PipelineResult {
    pub(crate) fn empty(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: PipelineStatus::Empty,
            message_count: 0,
            raw_bytes: 0,
            compressed_bytes: None,
            estimate: None,
            summary_estimate: None,
            diagnostic: None,
        }
    }

    pub(crate) fn unchanged(
        text: String,
        status: PipelineStatus,
        message_count: usize,
        estimate: CostEstimate,
    ) -> Self {
        Self {
            raw_bytes: text.len(),
            text,
            status,
            message_count,
            compressed_bytes: None,
            estimate: Some(estimate),
            summary_estimate: None,
            diagnostic: None,
        }
    }

    pub fn is_summarized(&self) -> bool {
        self.status == PipelineStatus::Summarized
    }
}
