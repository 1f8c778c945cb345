//! # Token Estimate
//!
//! Estimates the cost of a text blob for a given model id.
//!
//! - [`family`] - closed set of model families, each bound to one estimation method,
//!   and the registry that maps model ids onto them
//! - [`tokenizer`] - exact sub-word tokenizers (tiktoken)
//! - [`estimator`] - [`TokenEstimator`] dispatch and the character-ratio fallback
//!
//! ## Example
//!
//! ```rust
//! use token_estimate::{EstimationMethod, TokenEstimator};
//!
//! let estimate = TokenEstimator::new().estimate(&"a".repeat(400), "claude-3-opus");
//! assert_eq!(estimate.count, 100);
//! assert_eq!(estimate.method, EstimationMethod::ApproximateCharacterRatio);
//! ```

pub mod error;
pub mod estimator;
pub mod family;
pub mod tokenizer;

pub use error::TokenizerError;
pub use estimator::{approximate_token_count, CostEstimate, TokenEstimator, CHARS_PER_TOKEN};
pub use family::{normalize_model_id, EstimationMethod, FamilyRegistry, MatchKind, ModelFamily};
pub use tokenizer::{ExactTokenizer, TiktokenTokenizer};
