//! # Prompt
//!
//! Text rendering for chat history and LLM prompts.
//!
//! ## Template mini-language
//!
//! `{field_name}` tokens are substituted per record (or from a variable list).
//! Unknown fields render as an empty string in lenient mode (the default) and
//! are a [`TemplateError::FieldMissing`] in strict mode. See [`template`].
//!
//! ## History formatting
//!
//! [`format_history`] renders one line per [`memory_core::MessageRecord`] and
//! joins them with newlines in the given order. Pure and deterministic.
//!
//! ## External interactions
//!
//! - **AI models**: rendered text and [`ChatMessage`] lists are sent to LLM APIs.

pub mod history;
pub mod template;

pub use history::{format_history, HistoryFormatter, DEFAULT_HISTORY_TEMPLATE};
pub use template::{render, render_vars, TemplateError, TemplateMode};

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}
