//! Conversation and session configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::conversation::DEFAULT_MAX_HISTORY;

/// Conversation memory, session store and prompt location
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// Exchanges remembered per session
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Idle seconds before a session expires
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Live sessions kept in memory
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Directory holding the prompt templates
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,
}

impl ConversationConfig {
    /// Validate conversation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_history == 0 {
            return Err(ValidationError::InvalidHistorySize);
        }
        if self.session_ttl_secs == 0 || self.max_sessions == 0 {
            return Err(ValidationError::InvalidSessionLimits);
        }
        if self.prompts_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("CONVERSATION__PROMPTS_DIR"));
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            session_ttl_secs: default_session_ttl(),
            max_sessions: default_max_sessions(),
            prompts_dir: default_prompts_dir(),
        }
    }
}

fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}

fn default_session_ttl() -> u64 {
    3600
}

fn default_max_sessions() -> usize {
    1000
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}
