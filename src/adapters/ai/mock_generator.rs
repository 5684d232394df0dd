//! Mock Text Generator for testing.
//!
//! Provides a configurable mock implementation of the TextGenerator port,
//! allowing tests to drive a whole turn without a model server.
//!
//! # Features
//!
//! - Queued responses consumed in order
//! - Prompt-matched responses for steps whose order does not matter
//! - Error injection for fallback testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let generator = MockTextGenerator::new()
//!     .with_prompt_response("sql_scop3p", "SELECT * FROM protein")
//!     .with_response("Final answer");
//!
//! let text = generator.generate(GenerationRequest::new("...")).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{GenerationError, GenerationRequest, TextGenerator};

type Outcome = Result<String, GenerationError>;

/// Mock text generator for testing.
#[derive(Debug, Clone)]
pub struct MockTextGenerator {
    /// Pre-configured outcomes (consumed in order).
    responses: Arc<Mutex<VecDeque<Outcome>>>,
    /// Outcomes chosen by a substring of the prompt. Checked before the queue.
    prompt_rules: Arc<Mutex<Vec<(String, Outcome)>>>,
    /// Returned once the queue is exhausted.
    fallback: Outcome,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTextGenerator {
    /// Creates a mock that answers "Mock response" once its queue is empty.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            prompt_rules: Arc::new(Mutex::new(Vec::new())),
            fallback: Ok("Mock response".to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a mock whose every unscripted call fails.
    pub fn failing() -> Self {
        Self::new().with_fallback_error(GenerationError::unavailable("generator offline"))
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(content.into()));
        self
    }

    /// Adds an error to the queue.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Answers every prompt containing `needle` with `content`.
    pub fn with_prompt_response(self, needle: impl Into<String>, content: impl Into<String>) -> Self {
        self.prompt_rules
            .lock()
            .unwrap()
            .push((needle.into(), Ok(content.into())));
        self
    }

    /// Fails every prompt containing `needle`.
    pub fn with_prompt_error(self, needle: impl Into<String>, error: GenerationError) -> Self {
        self.prompt_rules
            .lock()
            .unwrap()
            .push((needle.into(), Err(error)));
        self
    }

    /// Sets the outcome once the queue is exhausted.
    pub fn with_fallback_error(mut self, error: GenerationError) -> Self {
        self.fallback = Err(error);
        self
    }

    /// Returns the number of calls made to this generator.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the prompts of all recorded calls.
    pub fn prompts(&self) -> Vec<String> {
        self.get_calls().into_iter().map(|c| c.prompt).collect()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn next_outcome(&self, prompt: &str) -> Outcome {
        let matched = self
            .prompt_rules
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, outcome)| outcome.clone());
        if let Some(outcome) = matched {
            return outcome;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let outcome = self.next_outcome(&request.prompt);
        self.calls.lock().unwrap().push(request);
        outcome
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest::new(prompt)
    }

    #[tokio::test]
    async fn returns_responses_in_order() {
        let generator = MockTextGenerator::new()
            .with_response("First")
            .with_response("Second");

        assert_eq!(generator.generate(request("a")).await.unwrap(), "First");
        assert_eq!(generator.generate(request("b")).await.unwrap(), "Second");
        assert_eq!(generator.generate(request("c")).await.unwrap(), "Mock response");
    }

    #[tokio::test]
    async fn prompt_rules_take_precedence() {
        let generator = MockTextGenerator::new()
            .with_response("queued")
            .with_prompt_response("SQL", "SELECT 1");

        assert_eq!(generator.generate(request("write SQL")).await.unwrap(), "SELECT 1");
        assert_eq!(generator.generate(request("other")).await.unwrap(), "queued");
    }

    #[tokio::test]
    async fn injected_errors_are_returned() {
        let generator = MockTextGenerator::new()
            .with_error(GenerationError::network("reset"))
            .with_prompt_error("router", GenerationError::parse("bad"));

        assert_eq!(
            generator.generate(request("x")).await,
            Err(GenerationError::network("reset"))
        );
        assert!(generator.generate(request("router prompt")).await.is_err());
    }

    #[tokio::test]
    async fn failing_mock_fails_every_call() {
        let generator = MockTextGenerator::failing();
        assert!(generator.generate(request("x")).await.is_err());
        assert!(generator.generate(request("y")).await.is_err());
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn records_calls() {
        let generator = MockTextGenerator::new();
        generator
            .generate(request("p").with_max_output_tokens(300))
            .await
            .unwrap();

        let calls = generator.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_output_tokens, Some(300));
        assert_eq!(generator.prompts(), vec!["p".to_string()]);

        generator.clear_calls();
        assert_eq!(generator.call_count(), 0);
    }
}
