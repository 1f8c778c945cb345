//! # Summary Memory
//!
//! Exposes chat history to a downstream model as one bounded block of text.
//!
//! A [`SummarizationPipeline`] fetches a window of chat turns, renders them with a
//! template, estimates the cost of the result for the configured model and, when
//! that exceeds the budget, asks the LLM to compress it.
//!
//! ## Modules
//!
//! - [`retriever`] - [`HistoryRetriever`]: primary store or external memory
//! - [`summarizer`] - [`Summarizer`]: one prompt, one LLM call, bounded by a timeout
//! - [`pipeline`] - [`SummarizationPipeline`]: the orchestrator
//! - [`config`] - [`SummaryMemoryConfig`], budget unit and filter stage
//! - [`result`] - [`PipelineResult`] and [`PipelineStatus`]
//! - [`error`] - fatal [`PipelineError`] and recoverable [`SummarizeError`]
//!
//! ## External Interactions
//!
//! - **Message stores**: `memory_core::MessageStore` / `ExternalMemory`
//! - **LLM**: `llm_client::LlmClient`
//! - **Token estimation**: `token_estimate::TokenEstimator`

pub mod config;
pub mod error;
pub mod pipeline;
pub mod result;
pub mod retriever;
pub mod summarizer;
pub mod utils;

pub use config::{BudgetUnit, FilterStage, SummaryMemoryConfig, UnknownVariant};
pub use error::{PipelineError, SummarizeError};
pub use pipeline::SummarizationPipeline;
pub use result::{PipelineResult, PipelineStatus};
pub use retriever::{retrieve_from_external, ExternalSource, HistoryRetriever};
pub use summarizer::{Summarizer, Summary};
pub use utils::truncate_for_log;
