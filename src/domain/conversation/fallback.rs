//! Keyword classifier used when the model cannot be consulted or understood.

use super::{Intent, IntentAction, IntentDecision, EXPLAIN_REPLY, GREETING_REPLY};

const SOCIAL_WORDS: &[&str] = &["hi", "hello", "thank", "thanks", "great", "awesome"];

const CONTINUATIONS: &[&str] = &["yes", "no", "continue", "tell me more", "yes please"];

/// Classifies a query deterministically from its lowercased, trimmed text.
///
/// Social words are matched as whole words so that "which" or "this" do not
/// read as a greeting.
pub fn fallback_decision(query: &str) -> IntentDecision {
    let q = query.trim().to_lowercase();

    let is_social = q
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| SOCIAL_WORDS.contains(&word));
    if is_social {
        return IntentDecision::new(
            Intent::Social,
            IntentAction::DirectResponse {
                answer: Some(GREETING_REPLY.to_string()),
            },
            0.7,
        );
    }

    let asks_definition = q.starts_with("what is")
        || q.starts_with("what are")
        || q.split(|c: char| !c.is_alphanumeric()).any(|w| w == "explain");
    if asks_definition {
        return IntentDecision::new(
            Intent::Informational,
            IntentAction::DirectResponse {
                answer: Some(EXPLAIN_REPLY.to_string()),
            },
            0.8,
        );
    }

    if CONTINUATIONS.contains(&q.as_str()) {
        return IntentDecision::new(
            Intent::Contextual,
            IntentAction::ExpandPrevious {
                topic: Some("previous_topic".to_string()),
            },
            0.8,
        );
    }

    IntentDecision::new(
        Intent::Research,
        IntentAction::DatabaseSearch {
            resolved_query: query.to_string(),
        },
        0.5,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_social() {
        let d = fallback_decision("Hi");
        assert_eq!(d.intent, Intent::Social);
        assert_eq!(
            d.action,
            IntentAction::DirectResponse {
                answer: Some(GREETING_REPLY.to_string())
            }
        );
    }

    #[test]
    fn thanks_with_punctuation_is_social() {
        assert_eq!(fallback_decision("Thanks, that was great!").intent, Intent::Social);
    }

    #[test]
    fn embedded_greeting_letters_are_not_social() {
        let d = fallback_decision("Which proteins are in this dataset?");
        assert_eq!(d.intent, Intent::Research);
    }

    #[test]
    fn definition_questions_are_informational() {
        assert_eq!(fallback_decision("What is ubiquitination?").intent, Intent::Informational);
        assert_eq!(fallback_decision("what are PTMs").intent, Intent::Informational);
        assert_eq!(
            fallback_decision("Can you explain SUMOylation").intent,
            Intent::Informational
        );
    }

    #[test]
    fn continuations_expand_previous() {
        for q in ["yes", "  Tell me more ", "YES PLEASE", "continue", "no"] {
            let d = fallback_decision(q);
            assert_eq!(d.intent, Intent::Contextual, "{}", q);
            assert!(matches!(d.action, IntentAction::ExpandPrevious { .. }));
        }
    }

    #[test]
    fn everything_else_searches_with_original_text() {
        let d = fallback_decision("Show me p53 phosphorylation sites");
        assert_eq!(
            d.action,
            IntentAction::DatabaseSearch {
                resolved_query: "Show me p53 phosphorylation sites".to_string()
            }
        );
        assert_eq!(d.confidence, 0.5);
    }
}
