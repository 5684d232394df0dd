//! Structured decision extraction.
//!
//! Model completions are *supposed* to be a JSON object but routinely arrive
//! wrapped in fences, surrounded by prose, or broken. Extraction runs in
//! tiers:
//!
//! 1. Strip outer code fences
//! 2. Collect brace-delimited candidates (at most one level of nesting)
//! 3. Accept the first candidate that parses as an object holding every
//!    required field
//! 4. Otherwise pull each required field out with a `"key": "value"` pattern
//! 5. Otherwise fail, and the caller substitutes its own decision
//!
//! Braces nested two or more levels deep are not matched. This keeps the
//! fallback behaviour stable for inputs that were never valid decisions.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use super::strip_code_fences;

/// Confidence attached to decisions recovered by the field-pattern tier.
pub const FIELD_PATTERN_CONFIDENCE: f64 = 0.6;

static STRING_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([A-Za-z_][A-Za-z0-9_]*)"\s*:\s*"([^"]+)""#).expect("valid regex")
});

/// Extraction failed at every tier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("empty model output")]
    Empty,

    #[error("no structured decision with fields {required:?} found")]
    NoDecision { required: Vec<String> },
}

/// Which tier produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTier {
    /// A complete JSON object was parsed.
    Structured,
    /// Only the required string fields were recovered.
    FieldPattern,
}

/// A decision object recovered from model output.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDecision {
    pub fields: Map<String, Value>,
    pub tier: ParseTier,
}

impl ParsedDecision {
    /// Returns a string field, trimmed. Empty strings count as absent.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns a boolean field. `"true"`/`"false"` strings are accepted.
    pub fn bool_field(&self, key: &str) -> Option<bool> {
        match self.fields.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns the decision's confidence.
    ///
    /// Field-pattern decisions always report [`FIELD_PATTERN_CONFIDENCE`].
    pub fn confidence(&self) -> Option<f64> {
        match self.tier {
            ParseTier::FieldPattern => Some(FIELD_PATTERN_CONFIDENCE),
            ParseTier::Structured => self.fields.get("confidence").and_then(Value::as_f64),
        }
    }
}

/// Finds brace-delimited substrings in order of appearance.
///
/// Candidates never overlap. An opening brace whose object nests deeper than
/// one level, or never closes, is skipped and scanning resumes at the next
/// character.
pub fn find_brace_candidates(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut candidates = Vec::new();
    let mut start = 0;

    while start < bytes.len() {
        if bytes[start] != b'{' {
            start += 1;
            continue;
        }
        match match_bounded_object(bytes, start) {
            Some(end) => {
                candidates.push(&text[start..=end]);
                start = end + 1;
            }
            None => start += 1,
        }
    }

    candidates
}

/// Returns the index of the closing brace for the object opened at `open`.
fn match_bounded_object(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0u8;
    for (offset, byte) in bytes[open..].iter().enumerate() {
        match byte {
            b'{' => {
                if depth == 2 {
                    return None;
                }
                depth += 1;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extracts a decision object holding every field in `required`.
pub fn parse_decision(raw: &str, required: &[&str]) -> Result<ParsedDecision, ParseFailure> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(ParseFailure::Empty);
    }

    for candidate in find_brace_candidates(&cleaned) {
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(fields)) => {
                if required.iter().all(|key| fields.contains_key(*key)) {
                    return Ok(ParsedDecision {
                        fields,
                        tier: ParseTier::Structured,
                    });
                }
                tracing::debug!(
                    keys = ?fields.keys().collect::<Vec<_>>(),
                    "Candidate object is missing required fields"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "Candidate did not parse as JSON"),
        }
    }

    if let Some(fields) = extract_string_fields(&cleaned, required) {
        tracing::debug!("Recovered decision from field patterns");
        return Ok(ParsedDecision {
            fields,
            tier: ParseTier::FieldPattern,
        });
    }

    Err(ParseFailure::NoDecision {
        required: required.iter().map(|s| s.to_string()).collect(),
    })
}

/// Pulls the first `"key": "value"` occurrence for each required key.
fn extract_string_fields(text: &str, required: &[&str]) -> Option<Map<String, Value>> {
    if required.is_empty() {
        return None;
    }

    let mut fields = Map::new();
    for caps in STRING_FIELD.captures_iter(text) {
        let key = &caps[1];
        if required.contains(&key) && !fields.contains_key(key) {
            fields.insert(key.to_string(), Value::String(caps[2].to_string()));
        }
    }

    if fields.len() == required.len() {
        Some(fields)
    } else {
        None
    }
}
