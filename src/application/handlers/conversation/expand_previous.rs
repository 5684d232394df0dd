//! ExpandPreviousHandler - Elaborates on the previous answer.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::conversation::{ConversationState, ExpansionPlan, EXPAND_UNAVAILABLE_REPLY};
use crate::domain::prompts::expansion_prompt;
use crate::ports::{GenerationRequest, TextGenerator};

/// Output budget of the elaboration call.
pub const EXPANSION_MAX_TOKENS: u32 = 500;

/// Handler for follow-ups such as "tell me more".
pub struct ExpandPreviousHandler {
    generator: Arc<dyn TextGenerator>,
}

impl ExpandPreviousHandler {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Never fails. Missing, short or greeting-like previous answers get a
    /// fixed clarification without calling the generator.
    pub async fn handle(&self, state: &ConversationState, topic: Option<&str>) -> String {
        let previous = match ExpansionPlan::for_previous(state.last_response()) {
            ExpansionPlan::Clarify(reply) => {
                debug!(topic, "Nothing substantive to expand, asking for specifics");
                return reply.to_string();
            }
            ExpansionPlan::Elaborate(previous) => previous,
        };

        let request = GenerationRequest::new(expansion_prompt(previous))
            .with_max_output_tokens(EXPANSION_MAX_TOKENS);
        match self.generator.generate(request).await {
            Ok(text) => {
                info!(topic, response_len = text.len(), "Expanded previous response");
                text
            }
            Err(e) => {
                warn!(error = %e, "Expansion failed");
                EXPAND_UNAVAILABLE_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockTextGenerator;
    use crate::domain::conversation::{
        AFTER_GREETING_EXPAND_REPLY, GREETING_REPLY, NOTHING_TO_EXPAND_REPLY,
        SHORT_PREVIOUS_EXPAND_REPLY,
    };

    const LONG_ANSWER: &str = "TP53 carries several well characterised phosphosites, including \
S15 and S20, which are modified in response to DNA damage and stabilise the protein.";

    fn handler(generator: &MockTextGenerator) -> ExpandPreviousHandler {
        ExpandPreviousHandler::new(Arc::new(generator.clone()))
    }

    #[tokio::test]
    async fn no_previous_response_makes_no_call() {
        let generator = MockTextGenerator::new();

        let reply = handler(&generator)
            .handle(&ConversationState::new(), None)
            .await;

        assert_eq!(reply, NOTHING_TO_EXPAND_REPLY);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn short_previous_response_makes_no_call() {
        let generator = MockTextGenerator::new();
        let mut state = ConversationState::new();
        state.record("sites?", "Three sites were found.");

        let reply = handler(&generator).handle(&state, None).await;

        assert_eq!(reply, SHORT_PREVIOUS_EXPAND_REPLY);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn greeting_previous_response_makes_no_call() {
        let generator = MockTextGenerator::new();
        let mut state = ConversationState::new();
        state.record("hi", GREETING_REPLY);

        let reply = handler(&generator).handle(&state, None).await;

        assert_eq!(reply, AFTER_GREETING_EXPAND_REPLY);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn elaborates_on_substantive_response() {
        let generator = MockTextGenerator::new().with_response("S15 is phosphorylated by ATM.");
        let mut state = ConversationState::new();
        state.record("p53 sites", LONG_ANSWER);

        let reply = handler(&generator)
            .handle(&state, Some("phosphosites"))
            .await;

        assert_eq!(reply, "S15 is phosphorylated by ATM.");
        let calls = generator.get_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains(LONG_ANSWER));
        assert_eq!(calls[0].max_output_tokens, Some(EXPANSION_MAX_TOKENS));
    }

    #[tokio::test]
    async fn generation_failure_apologises() {
        let generator = MockTextGenerator::failing();
        let mut state = ConversationState::new();
        state.record("p53 sites", LONG_ANSWER);

        let reply = handler(&generator).handle(&state, None).await;

        assert_eq!(reply, EXPAND_UNAVAILABLE_REPLY);
    }
}
