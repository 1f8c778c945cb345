//! CLI parser and config overrides.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use memory_core::{parse_sender_filter, RetrievalQuery, SenderType, SortOrder};
use summary_memory::{BudgetUnit, SummaryMemoryConfig};

#[derive(Parser, Debug)]
#[command(name = "summary-memory")]
#[command(about = "Chat history CLI: add, history, summarize", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append a chat turn to the SQLite store (DATABASE_URL).
    Add {
        #[arg(short, long)]
        session: String,
        /// ai or user
        #[arg(long)]
        sender: String,
        #[arg(short, long)]
        name: Option<String>,
        text: String,
    },
    /// Print the formatted history without calling the LLM.
    History {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Run the full pipeline: retrieve, format, estimate and summarize when over budget.
    Summarize {
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long)]
        character_limit: Option<usize>,
        /// cost or chars
        #[arg(long)]
        budget_unit: Option<String>,
        /// Summary prompt with {text} and {char_limit}
        #[arg(long)]
        prompt: Option<String>,
        /// Overrides MODEL for both the LLM call and estimation
        #[arg(long)]
        model: Option<String>,
    },
}

/// Retrieval flags shared by `history` and `summarize`.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Session id; falls back to SESSION_ID
    #[arg(long, default_value = "")]
    pub session: String,
    /// ai, user or both
    #[arg(long, default_value = "both")]
    pub sender: String,
    #[arg(long)]
    pub sender_name: Option<String>,
    /// 0 means no limit
    #[arg(short, long, default_value = "100")]
    pub limit: usize,
    /// asc or desc
    #[arg(long, default_value = "asc")]
    pub order: String,
    #[arg(long)]
    pub template: Option<String>,
}

impl QueryArgs {
    pub fn to_query(&self) -> Result<RetrievalQuery> {
        let sender_type = parse_sender_filter(&self.sender)
            .with_context(|| format!("Invalid --sender: {}", self.sender))?;
        let order: SortOrder = self
            .order
            .parse()
            .with_context(|| format!("Invalid --order: {}", self.order))?;

        let mut query = RetrievalQuery::for_session(self.session.trim())
            .with_sender_type(sender_type)
            .with_limit(self.limit)
            .with_order(order);
        if let Some(ref name) = self.sender_name {
            query = query.with_sender_name(name.clone());
        }
        Ok(query)
    }

    /// Applies `--template` on top of `config`.
    pub fn apply(&self, mut config: SummaryMemoryConfig) -> SummaryMemoryConfig {
        if let Some(ref template) = self.template {
            config = config.with_template(template.clone());
        }
        config
    }
}

/// Parses `--sender` for `add`, where "both" is not allowed.
pub fn parse_sender(sender: &str) -> Result<SenderType> {
    sender
        .parse::<SenderType>()
        .with_context(|| format!("Invalid --sender: {}", sender))
}

/// Applies `summarize` flags on top of `config`.
pub fn apply_summarize_overrides(
    mut config: SummaryMemoryConfig,
    character_limit: Option<usize>,
    budget_unit: Option<&str>,
    prompt: Option<&str>,
    model: Option<&str>,
) -> Result<SummaryMemoryConfig> {
    if let Some(limit) = character_limit {
        config = config.with_character_limit(limit);
    }
    if let Some(unit) = budget_unit {
        let unit = unit
            .parse::<BudgetUnit>()
            .with_context(|| format!("Invalid --budget-unit: {}", unit))?;
        config = config.with_budget_unit(unit);
    }
    if let Some(prompt) = prompt {
        config = config.with_prompt_template(prompt);
    }
    if let Some(model) = model {
        config = config.with_model_id(model);
    }
    Ok(config)
}
