//! Ollama Generator - Implementation of TextGenerator for an Ollama server.
//!
//! Posts to `{base_url}/api/generate` and reads the newline-delimited JSON
//! stream, concatenating every `response` field into one completion.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OllamaConfig::new("http://localhost:11434")
//!     .with_model("llama3:8b-instruct-q4_0")
//!     .with_num_ctx(4096);
//!
//! let generator = OllamaTextGenerator::new(config)?;
//! ```

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AiConfig;
use crate::ports::{GenerationError, GenerationRequest, TextGenerator};

/// Configuration for the Ollama generator.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Server base URL (default: http://localhost:11434).
    pub base_url: String,
    pub model: String,
    /// Context window used when a request does not set one.
    pub num_ctx: u32,
    /// Output budget used when a request does not set one.
    pub num_predict: u32,
    pub timeout: Duration,
    /// Bearer token for servers behind an authenticating proxy.
    api_key: Option<Secret<String>>,
}

impl OllamaConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: "llama3:8b-instruct-q4_0".to_string(),
            num_ctx: 4096,
            num_predict: 512,
            timeout: Duration::from_secs(120),
            api_key: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_num_ctx(mut self, num_ctx: u32) -> Self {
        self.num_ctx = num_ctx;
        self
    }

    pub fn with_num_predict(mut self, num_predict: u32) -> Self {
        self.num_predict = num_predict;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_api_key(mut self, api_key: Secret<String>) -> Self {
        self.api_key = Some(api_key);
        self
    }
}

impl From<&AiConfig> for OllamaConfig {
    fn from(config: &AiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            num_ctx: config.num_ctx,
            num_predict: config.num_predict,
            timeout: config.timeout(),
            api_key: config.api_key.clone(),
        }
    }
}

/// Ollama text generator.
pub struct OllamaTextGenerator {
    config: OllamaConfig,
    client: Client,
}

impl OllamaTextGenerator {
    pub fn new(config: OllamaConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }

    fn to_ollama_request<'a>(&'a self, request: &'a GenerationRequest) -> OllamaRequest<'a> {
        OllamaRequest {
            model: &self.config.model,
            prompt: &request.prompt,
            stream: true,
            options: OllamaOptions {
                num_ctx: self.config.num_ctx,
                num_predict: request.max_output_tokens.unwrap_or(self.config.num_predict),
            },
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key.expose_secret()),
            None => builder,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            GenerationError::unavailable(format!("Connection failed: {}", e))
        } else {
            GenerationError::network(e.to_string())
        }
    }

    /// Maps non-success statuses to errors.
    async fn handle_response_status(response: Response) -> Result<Response, GenerationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            500..=599 => Err(GenerationError::unavailable(format!(
                "Server error {}: {}",
                status, body
            ))),
            code => Err(GenerationError::Rejected {
                status: code,
                message: body,
            }),
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = self.to_ollama_request(&request);
        tracing::debug!(
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            num_predict = body.options.num_predict,
            "Sending generation request"
        );

        let response = self
            .authorize(self.client.post(self.generate_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::handle_response_status(response).await?;

        let mut accumulator = StreamAccumulator::default();
        let mut bytes = response.bytes_stream();
        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|e| GenerationError::network(format!("Stream error: {}", e)))?;
            accumulator.push(&chunk)?;
        }
        let output = accumulator.finish()?;

        tracing::debug!(response_len = output.len(), "Generation complete");
        Ok(output)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Reassembles a newline-delimited JSON stream whose chunks may split lines.
#[derive(Debug, Default)]
struct StreamAccumulator {
    pending: Vec<u8>,
    output: String,
}

impl StreamAccumulator {
    fn push(&mut self, bytes: &[u8]) -> Result<(), GenerationError> {
        self.pending.extend_from_slice(bytes);
        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            self.consume_line(&line)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<String, GenerationError> {
        let rest = std::mem::take(&mut self.pending);
        self.consume_line(&rest)?;
        Ok(self.output.trim().to_string())
    }

    fn consume_line(&mut self, line: &[u8]) -> Result<(), GenerationError> {
        let text = String::from_utf8_lossy(line);
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let chunk: StreamChunk = serde_json::from_str(text)
            .map_err(|e| GenerationError::parse(format!("Failed to parse stream line: {}", e)))?;
        if let Some(error) = chunk.error {
            return Err(GenerationError::Backend(error));
        }
        if let Some(piece) = chunk.response {
            self.output.push_str(&piece);
        }
        Ok(())
    }
}

// ----- Ollama API Types -----

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_ctx: u32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}
