//! Guard deciding whether a previous response is worth elaborating on.

use super::{AFTER_GREETING_EXPAND_REPLY, NOTHING_TO_EXPAND_REPLY, SHORT_PREVIOUS_EXPAND_REPLY};

const GREETING_PATTERNS: &[&str] = &[
    "hello!",
    "hi there!",
    "how can i help",
    "what would you like",
    "i'm happy to chat",
];

/// Responses shorter than this are treated as greetings when they match a pattern.
const GREETING_MAX_CHARS: usize = 200;

/// Responses shorter than this carry too little to expand on.
const SUBSTANTIVE_MIN_CHARS: usize = 100;

/// What `expand_previous` should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionPlan<'a> {
    /// Reply with a fixed clarification; no model call.
    Clarify(&'static str),
    /// Ask the model to elaborate on this previous response.
    Elaborate(&'a str),
}

impl<'a> ExpansionPlan<'a> {
    pub fn for_previous(last_response: Option<&'a str>) -> Self {
        let Some(previous) = last_response else {
            return ExpansionPlan::Clarify(NOTHING_TO_EXPAND_REPLY);
        };

        let len = previous.chars().count();
        let lowered = previous.to_lowercase();
        if len < GREETING_MAX_CHARS && GREETING_PATTERNS.iter().any(|p| lowered.contains(p)) {
            return ExpansionPlan::Clarify(AFTER_GREETING_EXPAND_REPLY);
        }
        if len < SUBSTANTIVE_MIN_CHARS {
            return ExpansionPlan::Clarify(SHORT_PREVIOUS_EXPAND_REPLY);
        }

        ExpansionPlan::Elaborate(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_to_expand() {
        assert_eq!(
            ExpansionPlan::for_previous(None),
            ExpansionPlan::Clarify(NOTHING_TO_EXPAND_REPLY)
        );
    }

    #[test]
    fn short_greeting_is_not_expanded() {
        let greeting = "Hello! I am here to help you with protein modification research. What would you like to know?";
        assert_eq!(
            ExpansionPlan::for_previous(Some(greeting)),
            ExpansionPlan::Clarify(AFTER_GREETING_EXPAND_REPLY)
        );
    }

    #[test]
    fn short_response_is_not_expanded() {
        let short = "TP53 has 12 known phosphosites in the database.";
        assert_eq!(
            ExpansionPlan::for_previous(Some(short)),
            ExpansionPlan::Clarify(SHORT_PREVIOUS_EXPAND_REPLY)
        );
    }

    #[test]
    fn long_response_with_greeting_words_is_expanded() {
        let long = format!("Hello! {}", "Serine 15 is phosphorylated by ATM. ".repeat(10));
        assert_eq!(
            ExpansionPlan::for_previous(Some(&long)),
            ExpansionPlan::Elaborate(long.as_str())
        );
    }

    #[test]
    fn substantive_response_is_expanded() {
        let text = "Ubiquitination tags proteins for degradation. ".repeat(4);
        assert!(matches!(
            ExpansionPlan::for_previous(Some(&text)),
            ExpansionPlan::Elaborate(_)
        ));
    }
}
