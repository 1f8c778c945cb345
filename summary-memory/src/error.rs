//! Pipeline error taxonomy.
//!
//! [`PipelineError`] carries only the fatal kinds. Summarization failures are
//! [`SummarizeError`]s, which the pipeline turns into a `SummarizationFailed` result.

use memory_core::StoreError;
use prompt::TemplateError;
use std::time::Duration;
use thiserror::Error;

/// Why the summarizer produced no text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SummarizeError {
    #[error("Summarization unavailable: {0}")]
    Unavailable(String),
    #[error("Summarization timed out after {0:?}")]
    TimedOut(Duration),
    #[error("Summary prompt invalid: {0}")]
    Prompt(#[from] TemplateError),
}

/// Fatal pipeline errors: propagated to the caller, never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
    #[error("Template field missing: {0}")]
    TemplateFieldMissing(#[from] TemplateError),
}
