//! HandleQueryHandler - Runs one conversational turn.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::{ClassifyIntentHandler, DirectResponseHandler, ExpandPreviousHandler};
use crate::application::handlers::domain_query::RunDomainQueryHandler;
use crate::domain::conversation::{ConversationState, IntentAction, IntentDecision, CLARIFY_REPLY};
use crate::ports::{SqlExecutor, TemplateStore, TextGenerator};

/// What a turn produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub response: String,
    pub decision: IntentDecision,
}

impl TurnOutcome {
    /// Label of the action the turn resolved to, e.g. `DATABASE_SEARCH`.
    pub fn action(&self) -> &'static str {
        self.decision.action.label()
    }
}

/// Turn orchestrator: classify, resolve the action, record the exchange.
pub struct HandleQueryHandler {
    classifier: ClassifyIntentHandler,
    expander: ExpandPreviousHandler,
    direct: DirectResponseHandler,
    domain_query: RunDomainQueryHandler,
}

impl HandleQueryHandler {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        executor: Arc<dyn SqlExecutor>,
        templates: Arc<dyn TemplateStore>,
    ) -> Self {
        Self {
            classifier: ClassifyIntentHandler::new(generator.clone(), templates.clone()),
            expander: ExpandPreviousHandler::new(generator.clone()),
            direct: DirectResponseHandler::new(generator.clone(), templates.clone()),
            domain_query: RunDomainQueryHandler::new(generator, executor, templates),
        }
    }

    /// Answers `query` and records the exchange in `state`.
    ///
    /// Never fails; the worst outcome is an apology string.
    pub async fn handle(&self, state: &mut ConversationState, query: &str) -> TurnOutcome {
        info!(query, history = state.len(), "Processing query");

        let decision = self.classifier.handle(state, query).await;

        let response = match &decision.action {
            IntentAction::DirectResponse { answer } => {
                self.direct.handle(query, answer.as_deref()).await
            }
            IntentAction::ExpandPrevious { topic } => {
                self.expander.handle(state, topic.as_deref()).await
            }
            IntentAction::Clarify => CLARIFY_REPLY.to_string(),
            IntentAction::DatabaseSearch { resolved_query } => {
                let resolved = if resolved_query.trim().is_empty() {
                    query
                } else {
                    resolved_query.as_str()
                };
                info!(resolved_query = resolved, "Proceeding to database pipeline");
                self.domain_query.handle(state, resolved).await
            }
        };

        state.record(query, response.clone());
        info!(
            action = decision.action.label(),
            response_len = response.len(),
            "Turn complete"
        );

        TurnOutcome { response, decision }
    }

    /// Replaces the state with a fresh one of the same capacity.
    pub fn reset(&self, state: &mut ConversationState) {
        state.reset();
        info!(capacity = state.capacity(), "Conversation reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockTextGenerator;
    use crate::adapters::database::MockSqlExecutor;
    use crate::adapters::templates::InMemoryTemplateStore;
    use crate::domain::conversation::{Intent, GREETING_REPLY};
    use crate::domain::routing::DatabaseId;

    fn handler(generator: &MockTextGenerator, executor: &MockSqlExecutor) -> HandleQueryHandler {
        HandleQueryHandler::new(
            Arc::new(generator.clone()),
            Arc::new(executor.clone()),
            Arc::new(InMemoryTemplateStore::new()),
        )
    }

    #[tokio::test]
    async fn greeting_with_failing_backend_uses_fixed_greeting() {
        let generator = MockTextGenerator::failing();
        let executor = MockSqlExecutor::new();
        let mut state = ConversationState::new();

        let outcome = handler(&generator, &executor).handle(&mut state, "Hi").await;

        assert_eq!(outcome.response, GREETING_REPLY);
        assert_eq!(outcome.decision.intent, Intent::Social);
        assert_eq!(outcome.action(), "DIRECT_RESPONSE");
        assert_eq!(state.len(), 1);
        assert_eq!(state.last_query(), Some("Hi"));
        assert_eq!(state.last_response(), Some(GREETING_REPLY));
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn clarify_needs_no_second_call() {
        let generator = MockTextGenerator::new()
            .with_response(r#"{"intent":"UNKNOWN","action":"CLARIFY"}"#);
        let executor = MockSqlExecutor::new();
        let mut state = ConversationState::new();

        let outcome = handler(&generator, &executor).handle(&mut state, "hmm").await;

        assert_eq!(outcome.response, CLARIFY_REPLY);
        assert_eq!(generator.call_count(), 1);
        assert_eq!(state.len(), 1);
    }

    #[tokio::test]
    async fn search_uses_resolved_query() {
        let generator = MockTextGenerator::new()
            .with_response(
                r#"{"intent":"RESEARCH","action":"DATABASE_SEARCH","resolved_query":"TP53 acetylation sites"}"#,
            )
            .with_prompt_response("for scop3ptm database", "SELECT 1")
            .with_prompt_response("DATABASE RESULTS", "No acetylation sites were found.");
        let executor = MockSqlExecutor::new();
        let mut state = ConversationState::new();

        let outcome = handler(&generator, &executor)
            .handle(&mut state, "and its acetylation?")
            .await;

        assert_eq!(outcome.response, "No acetylation sites were found.");
        assert_eq!(outcome.action(), "DATABASE_SEARCH");
        assert!(generator
            .prompts()
            .iter()
            .any(|p| p.contains("based on: TP53 acetylation sites")));
        assert_eq!(executor.statements_for(DatabaseId::Scop3ptm), vec!["SELECT 1"]);
        assert_eq!(state.last_query(), Some("and its acetylation?"));
    }

    #[tokio::test]
    async fn expansion_follows_substantive_answer() {
        let generator = MockTextGenerator::new()
            .with_response(r#"{"intent":"CONTEXTUAL","action":"EXPAND_PREVIOUS","expansion_topic":"S15"}"#)
            .with_response("S15 is phosphorylated by ATM and ATR after DNA damage.");
        let executor = MockSqlExecutor::new();
        let mut state = ConversationState::new();
        state.record(
            "p53 sites",
            "TP53 carries several well characterised phosphosites, including S15 and S20, \
             which are modified in response to DNA damage.",
        );

        let outcome = handler(&generator, &executor)
            .handle(&mut state, "tell me more")
            .await;

        assert_eq!(
            outcome.response,
            "S15 is phosphorylated by ATM and ATR after DNA damage."
        );
        assert_eq!(state.len(), 2);
    }

    #[tokio::test]
    async fn history_stays_bounded() {
        let generator = MockTextGenerator::failing();
        let executor = MockSqlExecutor::new();
        let handler = handler(&generator, &executor);
        let mut state = ConversationState::with_capacity(2);

        for query in ["hi", "thanks", "hello"] {
            handler.handle(&mut state, query).await;
        }

        let queries: Vec<_> = state.history().map(|e| e.user_query.as_str()).collect();
        assert_eq!(queries, vec!["thanks", "hello"]);
    }

    #[tokio::test]
    async fn reset_keeps_capacity() {
        let generator = MockTextGenerator::failing();
        let executor = MockSqlExecutor::new();
        let handler = handler(&generator, &executor);
        let mut state = ConversationState::with_capacity(6);
        handler.handle(&mut state, "hi").await;

        handler.reset(&mut state);

        assert!(state.is_empty());
        assert_eq!(state.last_response(), None);
        assert_eq!(state.capacity(), 6);
    }
}
