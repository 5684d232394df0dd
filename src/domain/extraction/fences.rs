//! Markdown fence handling for model completions.

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening fence at the very start, with any language tag.
static LEADING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\A\s*```[ \t]*[a-z0-9_+\-]*[ \t]*(?:\r?\n)?").expect("valid regex")
});

/// Closing fence at the very end.
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\r?\n)?[ \t]*```\s*\z").expect("valid regex"));

/// Any fence marker, anywhere.
static ANY_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```[ \t]*[a-z0-9_+\-]*").expect("valid regex"));

/// Removes a leading and a trailing markdown fence, then trims.
///
/// Text between the fences is left untouched. Input without fences is only
/// trimmed.
pub fn strip_code_fences(text: &str) -> String {
    let without_leading = LEADING_FENCE.replace(text, "");
    let without_trailing = TRAILING_FENCE.replace(&without_leading, "");
    without_trailing.trim().to_string()
}

/// Cleans a generated SQL statement.
///
/// Models often wrap SQL in ```sql fences or add a stray fence after a
/// sentence, so every fence marker is removed, not only the outer pair.
pub fn clean_sql_response(text: &str) -> String {
    let stripped = strip_code_fences(text);
    ANY_FENCE.replace_all(&stripped, "").trim().to_string()
}
