//! View rendering.
//!
//! # Placeholder Syntax
//! - `{{ key }}`: HTML-escaped value
//! - `{{- key }}`: raw value, for markup the action assembled itself
//! - `{{ user.name }}`: dotted lookup into nested objects and arrays
//!
//! Strings are substituted as-is, other JSON values are serialised. Unknown
//! keys render as nothing; unterminated tags are copied through.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app::controller::ViewData;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot read view \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Turns a resolved view plus action data into a response body.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &Path, data: &ViewData) -> Result<String, RenderError>;
}

/// Reads the view file and substitutes `{{ key }}` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderRenderer;

impl Renderer for PlaceholderRenderer {
    fn render(&self, view: &Path, data: &ViewData) -> Result<String, RenderError> {
        let template = fs::read_to_string(view).map_err(|source| RenderError::Io {
            path: view.to_path_buf(),
            source,
        })?;
        Ok(substitute(&template, data))
    }
}

/// Expand every placeholder in `template`.
pub fn substitute(template: &str, data: &ViewData) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];

        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };

        let tag = after[..close].trim();
        let (raw, key) = match tag.strip_prefix('-') {
            Some(key) => (true, key.trim()),
            None => (false, tag),
        };

        if let Some(value) = lookup(data, key) {
            let text = display(value);
            if raw {
                out.push_str(&text);
            } else {
                out.push_str(&escape_html(&text));
            }
        }

        rest = &after[close + 2..];
    }

    out.push_str(rest);
    out
}

fn lookup<'v>(data: &'v ViewData, key: &str) -> Option<&'v Value> {
    let mut parts = key.split('.');
    let mut value = data.get(parts.next()?)?;
    for part in parts {
        value = match value {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(value)
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
