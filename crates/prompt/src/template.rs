//! `{field}` template rendering.
//!
//! A placeholder is `{name}` where `name` is made of ASCII letters, digits and `_`.
//! `{{` and `}}` render a literal brace. Anything else containing a brace is copied
//! through in lenient mode and rejected in strict mode.

use std::borrow::Cow;
use thiserror::Error;

/// How unknown placeholders are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemplateMode {
    /// Unknown fields render as an empty string. Never fails.
    #[default]
    Lenient,
    /// Unknown fields and malformed placeholders are errors.
    Strict,
}

impl TemplateMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            TemplateMode::Strict
        } else {
            TemplateMode::Lenient
        }
    }
}

/// Template errors; only produced in [`TemplateMode::Strict`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template field missing: {field}")]
    FieldMissing { field: String },
    #[error("Malformed placeholder at byte {position}")]
    Malformed { position: usize },
}

/// Renders `template`, resolving each `{name}` through `lookup`.
pub fn render<'a, F>(template: &str, mode: TemplateMode, mut lookup: F) -> Result<String, TemplateError>
where
    F: FnMut(&str) -> Option<Cow<'a, str>>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(i) = rest.find(|c| c == '{' || c == '}') {
        out.push_str(&rest[..i]);
        let tail = &rest[i..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            if mode == TemplateMode::Strict {
                return Err(TemplateError::Malformed {
                    position: template.len() - tail.len(),
                });
            }
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        // tail starts with a single '{'
        match tail[1..].find('}').map(|end| &tail[1..1 + end]) {
            Some(name) if is_field_name(name) => {
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None if mode == TemplateMode::Strict => {
                        return Err(TemplateError::FieldMissing {
                            field: name.to_string(),
                        });
                    }
                    None => {}
                }
                rest = &tail[name.len() + 2..];
            }
            _ => {
                if mode == TemplateMode::Strict {
                    return Err(TemplateError::Malformed {
                        position: template.len() - tail.len(),
                    });
                }
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Renders `template` with a fixed set of `(name, value)` variables.
pub fn render_vars(
    template: &str,
    mode: TemplateMode,
    vars: &[(&str, &str)],
) -> Result<String, TemplateError> {
    render(template, mode, |name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| Cow::Owned(value.to_string()))
    })
}

fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
