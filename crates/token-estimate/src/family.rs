//! Model families and the registry that maps model identifiers onto them.
//!
//! Each family is bound to one estimation method. Lookup normalizes the model id
//! (trimmed, lowercased, provider prefix such as `openai/` dropped) and walks the
//! rules in registration order; the first match wins. Unknown ids map to
//! [`ModelFamily::Generic`], which uses the character ratio.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a cost figure was produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum EstimationMethod {
    /// Exact sub-word token count from a BPE tokenizer.
    ExactTokenizer,
    /// `ceil(chars / 4)`.
    ApproximateCharacterRatio,
}

impl fmt::Display for EstimationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationMethod::ExactTokenizer => f.write_str("exact-tokenizer"),
            EstimationMethod::ApproximateCharacterRatio => {
                f.write_str("approximate-character-ratio")
            }
        }
    }
}

/// Closed set of model families.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// OpenAI models: exact tiktoken counts.
    OpenAi,
    /// Anthropic Claude models: no public tokenizer, character ratio.
    Anthropic,
    /// Anything unrecognised: character ratio.
    Generic,
}

impl ModelFamily {
    /// The estimation method this family is bound to.
    pub fn method(&self) -> EstimationMethod {
        match self {
            ModelFamily::OpenAi => EstimationMethod::ExactTokenizer,
            ModelFamily::Anthropic | ModelFamily::Generic => {
                EstimationMethod::ApproximateCharacterRatio
            }
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelFamily::OpenAi => "openai",
            ModelFamily::Anthropic => "anthropic",
            ModelFamily::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// How a rule's pattern is compared with the normalized model id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Prefix,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FamilyRule {
    pattern: String,
    kind: MatchKind,
    family: ModelFamily,
}

impl FamilyRule {
    fn matches(&self, normalized: &str) -> bool {
        match self.kind {
            MatchKind::Prefix => normalized.starts_with(&self.pattern),
            MatchKind::Contains => normalized.contains(&self.pattern),
        }
    }
}

/// Ordered model-id rules. First match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyRegistry {
    rules: Vec<FamilyRule>,
}

impl FamilyRegistry {
    /// A registry with no rules: every model is `Generic`.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule at the end. Patterns are lowercased.
    pub fn with_rule(mut self, pattern: &str, kind: MatchKind, family: ModelFamily) -> Self {
        self.rules.push(FamilyRule {
            pattern: pattern.trim().to_ascii_lowercase(),
            kind,
            family,
        });
        self
    }

    /// Resolves the family for a model id.
    pub fn resolve(&self, model_id: &str) -> ModelFamily {
        let normalized = normalize_model_id(model_id);
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| rule.family)
            .unwrap_or(ModelFamily::Generic)
    }
}

impl Default for FamilyRegistry {
    fn default() -> Self {
        let registry = Self::empty().with_rule("claude", MatchKind::Contains, ModelFamily::Anthropic);
        [
            "gpt-", "gpt2", "gpt3", "gpt4", "chatgpt-", "o1", "o3", "o4", "ft:gpt-",
            "ft:davinci-", "ft:babbage-", "text-davinci-", "text-curie-", "text-babbage-",
            "text-ada-", "text-embedding-", "text-similarity-", "text-search-", "code-davinci-",
            "code-cushman-", "code-search-", "cushman-", "davinci", "curie", "babbage",
        ]
        .into_iter()
        .fold(registry, |registry, prefix| {
            registry.with_rule(prefix, MatchKind::Prefix, ModelFamily::OpenAi)
        })
    }
}

/// Trims, lowercases and drops a `provider/` prefix.
pub fn normalize_model_id(model_id: &str) -> String {
    let lowered = model_id.trim().to_ascii_lowercase();
    match lowered.rsplit_once('/') {
        Some((_, name)) => name.to_string(),
        None => lowered,
    }
}
