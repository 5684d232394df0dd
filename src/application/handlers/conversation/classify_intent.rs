//! ClassifyIntentHandler - Decides what a user message asks for.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::handlers::templates::load_optional;
use crate::domain::conversation::{fallback_decision, ContextKey, ConversationState, IntentDecision};
use crate::domain::extraction::parse_decision;
use crate::domain::prompts::{classifier_prompt, names};
use crate::ports::{GenerationRequest, TemplateStore, TextGenerator};

/// Output budget of the classification call.
pub const CLASSIFIER_MAX_TOKENS: u32 = 300;

const REQUIRED_FIELDS: [&str; 2] = ["intent", "action"];

/// Handler for intent classification.
///
/// One generation call per turn. Any failure (backend, unparseable output)
/// falls back to the deterministic keyword classifier, so `handle` never fails.
pub struct ClassifyIntentHandler {
    generator: Arc<dyn TextGenerator>,
    templates: Arc<dyn TemplateStore>,
}

impl ClassifyIntentHandler {
    pub fn new(generator: Arc<dyn TextGenerator>, templates: Arc<dyn TemplateStore>) -> Self {
        Self {
            generator,
            templates,
        }
    }

    /// Classifies `query` against the session's recent history.
    ///
    /// Entity and topic lists surfaced by the model replace the ones carried in
    /// the session's current context.
    pub async fn handle(&self, state: &mut ConversationState, query: &str) -> IntentDecision {
        let template = load_optional(self.templates.as_ref(), names::INTENT_CLASSIFIER).await;
        let prompt = classifier_prompt(
            template.as_deref(),
            &state.context_summary(),
            &state.current_context_json(),
            query,
        );
        debug!(prompt_len = prompt.len(), "Classifying intent");

        let request = GenerationRequest::new(prompt).with_max_output_tokens(CLASSIFIER_MAX_TOKENS);
        let raw = match self.generator.generate(request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    error = %e,
                    retryable = e.is_retryable(),
                    "Intent classification failed, using keyword classifier"
                );
                return log_decision(fallback_decision(query));
            }
        };

        let decision = match parse_decision(&raw, &REQUIRED_FIELDS) {
            Ok(parsed) => IntentDecision::from_parsed(&parsed, query),
            Err(failure) => {
                warn!(error = %failure, "Classifier output unusable, using keyword classifier");
                return log_decision(fallback_decision(query));
            }
        };

        if let Some(entities) = &decision.entities {
            state.merge_context(ContextKey::RecentEntities, entities.clone());
        }
        if let Some(topics) = &decision.topics {
            state.merge_context(ContextKey::RecentTopics, topics.clone());
        }

        log_decision(decision)
    }
}

fn log_decision(decision: IntentDecision) -> IntentDecision {
    info!(
        intent = ?decision.intent,
        action = decision.action.label(),
        confidence = decision.confidence,
        "Intent classified"
    );
    decision
}
