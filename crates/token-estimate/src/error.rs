//! Tokenizer error types.

use thiserror::Error;

/// Errors loading or running an exact tokenizer.
///
/// Recoverable: the estimator logs it and falls back to the character ratio.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizerError {
    #[error("Tokenizer lookup failed for model {model_id}: {reason}")]
    LookupFailed { model_id: String, reason: String },
}
