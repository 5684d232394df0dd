//! Template Store Port - Loads prompt templates by name.

use async_trait::async_trait;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),

    #[error("failed to read template {name}: {message}")]
    Unreadable { name: String, message: String },
}

/// Port for prompt template storage. Templates are immutable once loaded.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Loads a template by file name, e.g. `router.txt`.
    async fn load(&self, name: &str) -> Result<String, TemplateError>;
}
