//! Exact sub-word tokenizers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tiktoken_rs::CoreBPE;
use tracing::debug;

use crate::error::TokenizerError;

/// Exact token counter for a model id.
pub trait ExactTokenizer: Send + Sync {
    /// Returns the encoded length of `text`, or why no tokenizer is available for `model_id`.
    fn count(&self, model_id: &str, text: &str) -> Result<usize, TokenizerError>;
}

/// tiktoken encodings, loaded on first use per model and kept for the process lifetime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TiktokenTokenizer;

fn bpe_cache() -> &'static Mutex<HashMap<String, Arc<CoreBPE>>> {
    static CACHE: OnceLock<Mutex<HashMap<String, Arc<CoreBPE>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

impl TiktokenTokenizer {
    fn load(model_id: &str) -> Result<Arc<CoreBPE>, TokenizerError> {
        let mut cache = bpe_cache().lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bpe) = cache.get(model_id) {
            return Ok(Arc::clone(bpe));
        }
        let bpe = tiktoken_rs::get_bpe_from_model(model_id).map_err(|e| {
            TokenizerError::LookupFailed {
                model_id: model_id.to_string(),
                reason: e.to_string(),
            }
        })?;
        debug!(model_id, "Loaded tiktoken encoding");
        let bpe = Arc::new(bpe);
        cache.insert(model_id.to_string(), Arc::clone(&bpe));
        Ok(bpe)
    }
}

impl ExactTokenizer for TiktokenTokenizer {
    fn count(&self, model_id: &str, text: &str) -> Result<usize, TokenizerError> {
        let bpe = Self::load(model_id)?;
        // Chat text is data: special-token strings are counted as ordinary text.
        Ok(bpe.encode_ordinary(text).len())
    }
}
