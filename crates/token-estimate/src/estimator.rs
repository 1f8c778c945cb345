//! Cost estimation dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::family::{normalize_model_id, EstimationMethod, FamilyRegistry, ModelFamily};
use crate::tokenizer::{ExactTokenizer, TiktokenTokenizer};

/// Characters per approximate token.
pub const CHARS_PER_TOKEN: usize = 4;

/// `ceil(chars / 4)`, counted in Unicode scalar values so the figure does not
/// depend on the text's byte encoding.
pub fn approximate_token_count(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// An estimated cost with the method that produced it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CostEstimate {
    pub count: usize,
    pub method: EstimationMethod,
    pub family: ModelFamily,
}

impl CostEstimate {
    pub fn approximate(text: &str, family: ModelFamily) -> Self {
        Self {
            count: approximate_token_count(text),
            method: EstimationMethod::ApproximateCharacterRatio,
            family,
        }
    }
}

impl fmt::Display for CostEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.count, self.method, self.family)
    }
}

/// Estimates text cost for a model id.
///
/// The family registry picks the method. Exact-tokenizer failures fall back to
/// the character ratio and are logged; estimation itself never fails.
#[derive(Clone)]
pub struct TokenEstimator {
    registry: FamilyRegistry,
    tokenizer: Arc<dyn ExactTokenizer>,
}

impl TokenEstimator {
    pub fn new() -> Self {
        Self {
            registry: FamilyRegistry::default(),
            tokenizer: Arc::new(TiktokenTokenizer),
        }
    }

    pub fn with_registry(mut self, registry: FamilyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn ExactTokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn family(&self, model_id: &str) -> ModelFamily {
        self.registry.resolve(model_id)
    }

    pub fn estimate(&self, text: &str, model_id: &str) -> CostEstimate {
        let family = self.registry.resolve(model_id);
        match family.method() {
            EstimationMethod::ApproximateCharacterRatio => {
                let estimate = CostEstimate::approximate(text, family);
                debug!(model_id, %family, count = estimate.count, "Approximate token count");
                estimate
            }
            EstimationMethod::ExactTokenizer => {
                match self.tokenizer.count(&normalize_model_id(model_id), text) {
                    Ok(count) => {
                        debug!(model_id, %family, count, "Exact token count");
                        CostEstimate {
                            count,
                            method: EstimationMethod::ExactTokenizer,
                            family,
                        }
                    }
                    Err(e) => {
                        warn!(
                            model_id,
                            error = %e,
                            "Tokenizer lookup failed, using character ratio"
                        );
                        CostEstimate::approximate(text, family)
                    }
                }
            }
        }
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEstimator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
