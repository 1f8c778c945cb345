//! Pipeline configuration.
//!
//! Defaults match a plain chat-history memory: `{sender_name}: {text}` lines, a
//! budget of 1000 and a 60 second summarization timeout. [`SummaryMemoryConfig::from_env`]
//! overlays `SUMMARY_*` environment variables.

use anyhow::{Context, Result};
use prompt::DEFAULT_HISTORY_TEMPLATE;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CHARACTER_LIMIT: usize = 1000;
pub const DEFAULT_SUMMARY_PROMPT: &str = "{text} {char_limit}";
pub const DEFAULT_EMPTY_HISTORY_TEXT: &str = "no history available for summarization";
pub const DEFAULT_SUMMARIZE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

/// What the budget is compared against.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BudgetUnit {
    /// The estimator's count (tokens or approximate units) for the configured model.
    #[default]
    EstimatedCost,
    /// The formatted text's length in characters.
    Characters,
}

impl FromStr for BudgetUnit {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cost" | "tokens" | "estimated_cost" | "estimated-cost" => Ok(BudgetUnit::EstimatedCost),
            "chars" | "characters" => Ok(BudgetUnit::Characters),
            other => Err(UnknownVariant {
                kind: "budget unit",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for BudgetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetUnit::EstimatedCost => f.write_str("estimated_cost"),
            BudgetUnit::Characters => f.write_str("characters"),
        }
    }
}

/// When sender filters run on the external-memory path.
///
/// The primary store always filters before limiting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterStage {
    /// Filter, then order, then truncate.
    #[default]
    BeforeLimit,
    /// Order, truncate, then filter. The result may hold fewer than `limit` records
    /// even when more matching ones exist.
    AfterLimit,
}

impl FromStr for FilterStage {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before" | "before_limit" | "before-limit" => Ok(FilterStage::BeforeLimit),
            "after" | "after_limit" | "after-limit" => Ok(FilterStage::AfterLimit),
            other => Err(UnknownVariant {
                kind: "filter stage",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMemoryConfig {
    /// Per-record history template.
    pub template: String,
    /// Budget above which the history is summarized. Also passed to the prompt as `{char_limit}`.
    pub character_limit: usize,
    pub budget_unit: BudgetUnit,
    /// Summarization prompt with `{text}` and `{char_limit}` placeholders.
    pub prompt_template: String,
    /// `None` waits for the LLM indefinitely.
    pub summarize_timeout: Option<Duration>,
    pub strict_template: bool,
    pub empty_history_text: String,
    /// Model id for estimation; defaults to the LLM client's model.
    pub model_id: Option<String>,
    /// Used when a query carries an empty session id.
    pub default_session_id: Option<String>,
    pub filter_stage: FilterStage,
}

impl Default for SummaryMemoryConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_HISTORY_TEMPLATE.to_string(),
            character_limit: DEFAULT_CHARACTER_LIMIT,
            budget_unit: BudgetUnit::default(),
            prompt_template: DEFAULT_SUMMARY_PROMPT.to_string(),
            summarize_timeout: Some(DEFAULT_SUMMARIZE_TIMEOUT),
            strict_template: false,
            empty_history_text: DEFAULT_EMPTY_HISTORY_TEXT.to_string(),
            model_id: None,
            default_session_id: None,
            filter_stage: FilterStage::default(),
        }
    }
}

impl SummaryMemoryConfig {
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_character_limit(mut self, limit: usize) -> Self {
        self.character_limit = limit;
        self
    }

    pub fn with_budget_unit(mut self, unit: BudgetUnit) -> Self {
        self.budget_unit = unit;
        self
    }

    pub fn with_prompt_template(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_template = prompt.into();
        self
    }

    pub fn with_summarize_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.summarize_timeout = timeout;
        self
    }

    pub fn with_strict_template(mut self, strict: bool) -> Self {
        self.strict_template = strict;
        self
    }

    pub fn with_empty_history_text(mut self, text: impl Into<String>) -> Self {
        self.empty_history_text = text.into();
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_default_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.default_session_id = Some(session_id.into()).filter(|s: &String| !s.is_empty());
        self
    }

    pub fn with_filter_stage(mut self, stage: FilterStage) -> Self {
        self.filter_stage = stage;
        self
    }

    /// Defaults overlaid with environment variables: SUMMARY_TEMPLATE,
    /// SUMMARY_CHARACTER_LIMIT, SUMMARY_BUDGET_UNIT, SUMMARY_PROMPT,
    /// SUMMARY_TIMEOUT_SECS (0 disables), SUMMARY_STRICT_TEMPLATE, SUMMARY_MODEL_ID,
    /// SUMMARY_FILTER_STAGE, SESSION_ID.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(template) = get("SUMMARY_TEMPLATE") {
            config.template = template;
        }
        if let Some(raw) = get("SUMMARY_CHARACTER_LIMIT") {
            config.character_limit = raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("SUMMARY_CHARACTER_LIMIT is not a number: {}", raw))?;
        }
        if let Some(raw) = get("SUMMARY_BUDGET_UNIT") {
            config.budget_unit = raw.parse::<BudgetUnit>().context("SUMMARY_BUDGET_UNIT")?;
        }
        if let Some(prompt) = get("SUMMARY_PROMPT") {
            config.prompt_template = prompt;
        }
        if let Some(raw) = get("SUMMARY_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("SUMMARY_TIMEOUT_SECS is not a number: {}", raw))?;
            config.summarize_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(raw) = get("SUMMARY_STRICT_TEMPLATE") {
            config.strict_template = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        config.model_id = get("SUMMARY_MODEL_ID");
        if let Some(raw) = get("SUMMARY_FILTER_STAGE") {
            config.filter_stage = raw.parse::<FilterStage>().context("SUMMARY_FILTER_STAGE")?;
        }
        config.default_session_id = get("SESSION_ID");

        Ok(config)
    }
}
