//! Tolerant two-stage JSON extraction for generated text.
//!
//! Structured outputs arrive as JSON, frequently wrapped in markdown
//! code fences and sometimes surrounded by prose. Decoding is a single
//! explicit sequence: strip fences, strict parse, then one bounded
//! brace-extraction retry. There is no further recovery — callers fall
//! back to their component-specific defaults on [`TextGenError::Unstructured`].

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::TextGenError;

/// Greedy outermost-brace match, dot-matches-newline. Bounded to one
/// object: the first `{` through the last `}` in the text.
static BRACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("brace regex is valid"));

/// Decodes a typed value from generated text.
///
/// Stage 1: strip ```` ```json ```` / ```` ``` ```` fences and
/// whitespace, then strict-parse. Stage 2: if that fails, extract the
/// outermost `{...}` span from the original text and parse that.
///
/// # Errors
///
/// Returns [`TextGenError::Unstructured`] with a short snippet of the
/// offending text when neither stage yields a decodable value.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, TextGenError> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    if let Ok(value) = serde_json::from_str::<T>(cleaned) {
        return Ok(value);
    }

    if let Some(m) = BRACE_RE.find(text) {
        if let Ok(value) = serde_json::from_str::<T>(m.as_str()) {
            return Ok(value);
        }
    }

    Err(TextGenError::Unstructured {
        snippet: snippet(text),
    })
}

/// First 120 chars of the text, for error context without dumping the
/// whole generation into logs.
fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    let mut end = trimmed.len().min(120);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
