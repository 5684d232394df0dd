//! Tolerant extraction of structured data from free-text model output.
//!
//! - `fences` - Markdown code-fence stripping and SQL cleanup
//! - `structured` - Decision-object extraction with regex and fallback tiers

mod fences;
mod structured;

pub use fences::{clean_sql_response, strip_code_fences};
pub use structured::{
    find_brace_candidates, parse_decision, ParseFailure, ParseTier, ParsedDecision,
    FIELD_PATTERN_CONFIDENCE,
};
