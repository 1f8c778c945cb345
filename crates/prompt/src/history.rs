//! History formatting: one rendered template line per message record.

use memory_core::MessageRecord;

use crate::template::{render, TemplateError, TemplateMode};

/// Default line template.
pub const DEFAULT_HISTORY_TEMPLATE: &str = "{sender_name}: {text}";

/// Renders each record through `template` and joins the lines with `\n`, keeping
/// the sequence's order. Fails only in strict mode.
pub fn format_history(
    template: &str,
    records: &[MessageRecord],
    mode: TemplateMode,
) -> Result<String, TemplateError> {
    let lines = records
        .iter()
        .map(|record| render(template, mode, |name| record.field(name)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// A configured template plus mode; formatting has no other state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFormatter {
    template: String,
    mode: TemplateMode,
}

impl HistoryFormatter {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            mode: TemplateMode::Lenient,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.mode = TemplateMode::from_strict(strict);
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn format(&self, records: &[MessageRecord]) -> Result<String, TemplateError> {
        format_history(&self.template, records, self.mode)
    }
}

impl Default for HistoryFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_TEMPLATE)
    }
}
