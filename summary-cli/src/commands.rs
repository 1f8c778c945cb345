//! Command handlers. Each opens the SQLite store at `database_url`.

use anyhow::{Context, Result};
use llm_client::EnvLlmConfig;
use memory_core::{MessageRecord, NewMessage, RetrievalQuery};
use prompt::HistoryFormatter;
use std::sync::Arc;
use storage::MessageRepository;
use summary_memory::{HistoryRetriever, PipelineResult, SummarizationPipeline, SummaryMemoryConfig};
use tracing::info;

use crate::cli::{apply_summarize_overrides, parse_sender, QueryArgs};

pub const DEFAULT_DATABASE_URL: &str = "./summary_memory.db";

/// DATABASE_URL, or `./summary_memory.db`.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

async fn open_store(database_url: &str) -> Result<MessageRepository> {
    MessageRepository::new(database_url)
        .await
        .with_context(|| format!("Failed to open message store at {}", database_url))
}

/// Appends one turn and returns the stored record.
pub async fn handle_add(
    database_url: &str,
    session: &str,
    sender: &str,
    name: Option<String>,
    text: String,
) -> Result<MessageRecord> {
    let sender_type = parse_sender(sender)?;
    let repo = open_store(database_url).await?;

    let mut message = NewMessage::new(session, sender_type, text);
    if let Some(name) = name {
        message = message.with_sender_name(name);
    }
    let record = repo.save(message).await?;
    info!(
        session_id = %record.session_id(),
        position = record.sequence_position(),
        "Message added"
    );
    Ok(record)
}

/// Retrieves and formats history without calling the LLM.
pub async fn handle_history(
    database_url: &str,
    config: &SummaryMemoryConfig,
    args: &QueryArgs,
) -> Result<String> {
    let config = args.apply(config.clone());
    let query: RetrievalQuery = args
        .to_query()?
        .resolve_session(config.default_session_id.as_deref());
    let repo = open_store(database_url).await?;
    let retriever = HistoryRetriever::new(Arc::new(repo)).with_filter_stage(config.filter_stage);

    let records = retriever.retrieve(&query, None).await?;
    if records.is_empty() {
        return Ok(config.empty_history_text.clone());
    }
    let formatter = HistoryFormatter::new(config.template.clone()).strict(config.strict_template);
    Ok(formatter.format(&records)?)
}

/// Runs the full pipeline with the OpenAI collaborator from env.
pub async fn handle_summarize(
    database_url: &str,
    config: SummaryMemoryConfig,
    args: &QueryArgs,
    character_limit: Option<usize>,
    budget_unit: Option<&str>,
    prompt: Option<&str>,
    model: Option<&str>,
) -> Result<PipelineResult> {
    let config =
        apply_summarize_overrides(args.apply(config), character_limit, budget_unit, prompt, model)?;
    let query = args.to_query()?;

    let mut llm_config = EnvLlmConfig::from_env()
        .context("Load LLM config from .env (OPENAI_API_KEY, OPENAI_BASE_URL, MODEL)")?;
    if let Some(model) = model {
        llm_config.llm_model = model.to_string();
    }
    let llm = Arc::new(llm_config.build_client());
    let repo = open_store(database_url).await?;

    let pipeline = SummarizationPipeline::new(Arc::new(repo), llm, config);
    Ok(pipeline.run(query).await?)
}

/// One status line followed by the text.
pub fn render_result(result: &PipelineResult) -> String {
    let mut header = format!("status: {} | messages: {}", result.status, result.message_count);
    if let Some(ref estimate) = result.estimate {
        header.push_str(&format!(" | cost: {}", estimate));
    }
    if let Some(ref estimate) = result.summary_estimate {
        header.push_str(&format!(" | summary cost: {}", estimate));
    }
    if let Some(ref diagnostic) = result.diagnostic {
        header.push_str(&format!(" | {}", diagnostic));
    }
    format!("{}\n{}", header, result.text)
}
