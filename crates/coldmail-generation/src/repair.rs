//! Extract-or-fail recovery of `{"email": ...}` from generation output.
//!
//! Rules, tried in order:
//! 1. the whole reply parses as the expected object;
//! 2. a fenced code block (```` ```json ```` or bare ```` ``` ````) parses;
//! 3. the first balanced `{...}` span, scanned string-aware, that parses.
//!
//! A candidate only counts if it carries a non-empty string `email`.

use std::sync::LazyLock;

use coldmail_core::GenerationResult;
use regex::Regex;
use serde::Deserialize;

use crate::error::GenerationError;

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("valid code fence regex")
});

#[derive(Deserialize)]
struct EmailShape {
    email: String,
}

/// Recovers the email object from raw service output.
///
/// # Errors
///
/// Returns [`GenerationError::Format`] when no rule yields a usable object.
pub fn extract_email(raw: &str) -> Result<GenerationResult, GenerationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(GenerationError::Format("empty response".to_string()));
    }

    if let Some(result) = parse_candidate(text) {
        return Ok(result);
    }

    for caps in FENCE_RE.captures_iter(text) {
        if let Some(result) = caps.get(1).and_then(|m| parse_candidate(m.as_str())) {
            tracing::debug!("recovered email from fenced block");
            return Ok(result);
        }
    }

    for span in balanced_objects(text) {
        if let Some(result) = parse_candidate(span) {
            tracing::debug!("recovered email from embedded object");
            return Ok(result);
        }
    }

    Err(GenerationError::Format(format!(
        "no {{\"email\": string}} object found in {} chars of output",
        text.len()
    )))
}

fn parse_candidate(candidate: &str) -> Option<GenerationResult> {
    let shape: EmailShape = serde_json::from_str(candidate.trim()).ok()?;
    let email = shape.email.trim();
    (!email.is_empty()).then(|| GenerationResult {
        email: email.to_string(),
    })
}

/// Every balanced `{...}` span in `text`, ordered by start position.
///
/// Braces inside JSON string literals are ignored.
fn balanced_objects(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();

    for (start, _) in text.match_indices('{') {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, &b) in bytes[start..].iter().enumerate() {
            if in_string {
                match b {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        spans.push(&text[start..=start + offset]);
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    spans
}
