//! Pull a JSON object out of free-form model text.
//!
//! Models answer with bare JSON, JSON inside a Markdown fence, or JSON
//! surrounded by prose (sometimes with trailing commas). Candidates are
//! tried in that order and the first one that parses wins.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::SchemaError;

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("valid fence regex"))
}

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",(\s*[}\]])").expect("valid trailing comma regex"))
}

/// Extract the first JSON object from model output
pub fn extract_json(text: &str) -> Result<Value, SchemaError> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    for caps in fence_re().captures_iter(trimmed) {
        if let Some(body) = caps.get(1) {
            if let Some(value) = parse_lenient(body.as_str()) {
                return Ok(value);
            }
        }
    }

    for candidate in balanced_objects(trimmed) {
        if let Some(value) = parse_lenient(candidate) {
            return Ok(value);
        }
    }

    Err(SchemaError::NoJson)
}

fn parse_lenient(candidate: &str) -> Option<Value> {
    serde_json::from_str(candidate).ok().or_else(|| {
        let cleaned = trailing_comma_re().replace_all(candidate, "$1");
        serde_json::from_str(&cleaned).ok()
    })
}

/// Top-level `{...}` spans, ignoring braces inside string literals
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    spans
}
