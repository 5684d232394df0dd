//! Ollama settings shared by every generation call

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Which model answers, and how much it may read and write per call
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Tag as listed by `ollama list`
    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer token, for servers behind an authenticating proxy
    pub api_key: Option<Secret<String>>,

    /// Context window in tokens
    #[serde(default = "default_num_ctx")]
    pub num_ctx: u32,

    /// Output budget for calls that do not set their own
    #[serde(default = "default_num_predict")]
    pub num_predict: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.base_url.split_once("://") {
            None if self.base_url.trim().is_empty() => {
                return Err(ValidationError::MissingRequired("AI__BASE_URL"))
            }
            Some(("http" | "https", rest)) if !rest.is_empty() => {}
            _ => return Err(ValidationError::InvalidModelUrl),
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__MODEL"));
        }
        if self.num_ctx == 0 || self.num_predict == 0 || self.num_predict > self.num_ctx {
            return Err(ValidationError::InvalidGenerationLimits);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            num_ctx: default_num_ctx(),
            num_predict: default_num_predict(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3:8b-instruct-q4_0".to_string()
}

fn default_num_ctx() -> u32 {
    4096
}

fn default_num_predict() -> u32 {
    512
}

fn default_timeout() -> u64 {
    120
}
