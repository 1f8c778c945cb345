//! Logging helpers.

/// Truncates a string for logging; appends "..." if truncated.
///
/// Cuts on a char boundary, so `max_chars` counts characters, not bytes.
pub fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
