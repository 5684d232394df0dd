//! Runtime settings for the assistant.
//!
//! Everything comes from `SCOP3P_ASSISTANT__<SECTION>__<KEY>` environment
//! variables, optionally seeded from a `.env` file. Unset keys fall back to a
//! local setup: Ollama on `localhost:11434` and both PostgreSQL databases on
//! `localhost:5432`.
//!
//! ```no_run
//! use scop3p_assistant::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration loads");
//! config.validate().expect("configuration is valid");
//! ```

mod ai;
mod conversation;
mod database;
mod error;
mod server;

pub use ai::AiConfig;
pub use conversation::ConversationConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// All sections of the assistant's settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Ollama connection and generation limits
    #[serde(default)]
    pub ai: AiConfig,

    /// Scop3P and Scop3PTM connection pools
    #[serde(default)]
    pub database: DatabaseConfig,

    /// History depth, session expiry and prompt location
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl AppConfig {
    /// Reads `.env` (when present) and the process environment.
    ///
    /// `SCOP3P_ASSISTANT__AI__MODEL=mistral:7b` sets `ai.model`. Values that do
    /// not parse into their field type fail the load; range checks are left to
    /// [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SCOP3P_ASSISTANT")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Checks every section, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.database.validate()?;
        self.conversation.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "SCOP3P_ASSISTANT__SERVER__PORT",
        "SCOP3P_ASSISTANT__SERVER__ENVIRONMENT",
        "SCOP3P_ASSISTANT__AI__MODEL",
        "SCOP3P_ASSISTANT__DATABASE__SCOP3P_URL",
        "SCOP3P_ASSISTANT__CONVERSATION__MAX_HISTORY",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn unset_environment_gives_local_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.ai.model, "llama3:8b-instruct-q4_0");
        assert_eq!(config.conversation.max_history, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn prefixed_variables_override_sections() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SCOP3P_ASSISTANT__SERVER__PORT", "3000");
        env::set_var("SCOP3P_ASSISTANT__AI__MODEL", "mistral:7b");
        env::set_var(
            "SCOP3P_ASSISTANT__DATABASE__SCOP3P_URL",
            "postgresql://reader@db:5432/scop3p",
        );
        env::set_var("SCOP3P_ASSISTANT__CONVERSATION__MAX_HISTORY", "6");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.ai.model, "mistral:7b");
        assert_eq!(
            config.database.scop3p_url.as_deref(),
            Some("postgresql://reader@db:5432/scop3p")
        );
        assert_eq!(config.conversation.max_history, 6);
    }

    #[test]
    fn production_environment_is_detected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SCOP3P_ASSISTANT__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }
}
