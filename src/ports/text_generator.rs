//! Text Generator Port - Interface for the text-generation backend.
//!
//! Every model call the assistant makes (intent classification, routing,
//! SQL generation, expansion, direct answers, synthesis) goes through this
//! single prompt-in, completion-out contract.
//!
//! # Design
//!
//! - One call per step, no retries in the core
//! - Streamed output is concatenated by the adapter before returning
//! - Output budgets travel with the request; the context window is fixed
//!   per generator

use async_trait::async_trait;

/// Port for text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for the prompt.
    ///
    /// The returned text is the whole completion, trimmed.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;

    /// Name of the model behind this generator, for logging.
    fn model_name(&self) -> &str;
}

/// Request for a single completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Maximum tokens to generate. `None` uses the backend's configured default.
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_output_tokens: None,
        }
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// Text generation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Backend is unreachable or returned a server error.
    #[error("generator unavailable: {message}")]
    Unavailable { message: String },

    /// Backend rejected the request.
    #[error("generation rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Network error during the request or while streaming.
    #[error("network error: {0}")]
    Network(String),

    /// A streamed line could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Backend reported an error inside the stream.
    #[error("backend error: {0}")]
    Backend(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl GenerationError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if a later attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Unavailable { .. }
                | GenerationError::Network(_)
                | GenerationError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_limits() {
        let request = GenerationRequest::new("prompt")
            .with_max_output_tokens(300);

        assert_eq!(request.prompt, "prompt");
        assert_eq!(request.max_output_tokens, Some(300));
    }

    #[test]
    fn new_request_uses_backend_defaults() {
        let request = GenerationRequest::new("p");
        assert!(request.max_output_tokens.is_none());
    }

    #[test]
    fn retryable_errors_are_transient_ones() {
        assert!(GenerationError::unavailable("down").is_retryable());
        assert!(GenerationError::network("reset").is_retryable());
        assert!(GenerationError::Timeout { timeout_secs: 5 }.is_retryable());
        assert!(!GenerationError::parse("bad line").is_retryable());
        assert!(!GenerationError::Rejected {
            status: 404,
            message: "model not found".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn errors_display_their_cause() {
        let err = GenerationError::Rejected {
            status: 400,
            message: "bad prompt".to_string(),
        };
        assert_eq!(err.to_string(), "generation rejected with status 400: bad prompt");
    }
}
