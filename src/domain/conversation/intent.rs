//! Intent decisions produced by the classifier.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::extraction::ParsedDecision;

/// Confidence assumed when the model omits one.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Coarse category of a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Social,
    Informational,
    Contextual,
    Research,
    Unknown,
}

impl Intent {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "SOCIAL" => Intent::Social,
            "INFORMATIONAL" => Intent::Informational,
            "CONTEXTUAL" => Intent::Contextual,
            "RESEARCH" => Intent::Research,
            _ => Intent::Unknown,
        }
    }
}

/// What the turn should do next, with the payload each action needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentAction {
    /// Answer without touching the databases.
    DirectResponse { answer: Option<String> },
    /// Elaborate on the previous bot response.
    ExpandPrevious { topic: Option<String> },
    /// Ask the user to be more specific.
    Clarify,
    /// Run the data pipeline on `resolved_query`.
    DatabaseSearch { resolved_query: String },
}

impl IntentAction {
    /// Wire label of the action.
    pub fn label(&self) -> &'static str {
        match self {
            IntentAction::DirectResponse { .. } => "DIRECT_RESPONSE",
            IntentAction::ExpandPrevious { .. } => "EXPAND_PREVIOUS",
            IntentAction::Clarify => "CLARIFY",
            IntentAction::DatabaseSearch { .. } => "DATABASE_SEARCH",
        }
    }
}

/// A classifier outcome for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDecision {
    pub intent: Intent,
    pub action: IntentAction,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<Value>>,
}

impl IntentDecision {
    pub fn new(intent: Intent, action: IntentAction, confidence: f64) -> Self {
        Self {
            intent,
            action,
            confidence,
            entities: None,
            topics: None,
        }
    }

    /// Builds a decision from a parsed model response.
    ///
    /// Unrecognised actions become a database search. A search always carries
    /// a non-empty query, falling back to `original_query`.
    pub fn from_parsed(parsed: &ParsedDecision, original_query: &str) -> Self {
        let intent = parsed
            .str_field("intent")
            .map(Intent::from_label)
            .unwrap_or(Intent::Unknown);

        let action = match parsed
            .str_field("action")
            .map(str::to_ascii_uppercase)
            .as_deref()
        {
            Some("DIRECT_RESPONSE") => IntentAction::DirectResponse {
                answer: parsed.str_field("direct_response").map(str::to_string),
            },
            Some("EXPAND_PREVIOUS") => IntentAction::ExpandPrevious {
                topic: parsed.str_field("expansion_topic").map(str::to_string),
            },
            Some("CLARIFY") => IntentAction::Clarify,
            _ => IntentAction::DatabaseSearch {
                resolved_query: parsed
                    .str_field("resolved_query")
                    .unwrap_or(original_query)
                    .to_string(),
            },
        };

        Self {
            intent,
            action,
            confidence: parsed.confidence().unwrap_or(DEFAULT_CONFIDENCE),
            entities: list_field(parsed, "entities_mentioned"),
            topics: list_field(parsed, "topics_mentioned"),
        }
    }

    /// Returns true if the turn ends without running the data pipeline.
    pub fn is_terminal(&self) -> bool {
        !matches!(self.action, IntentAction::DatabaseSearch { .. })
    }
}

fn list_field(parsed: &ParsedDecision, key: &str) -> Option<Vec<Value>> {
    parsed.fields.get(key).and_then(Value::as_array).cloned()
}
