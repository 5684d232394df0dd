//! Session Store Port - Keeps one conversation state per session.
//!
//! The HTTP surface loads the state for a session, runs a turn against it
//! and saves it back. Stores define their own expiry policy.

use async_trait::async_trait;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::SessionId;

/// Errors that can occur during session storage operations
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Port for persisting conversation state per session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the state for a session.
    ///
    /// # Errors
    /// Returns `SessionStoreError::NotFound` if the session is unknown or expired
    async fn load(&self, session_id: SessionId) -> Result<ConversationState, SessionStoreError>;

    /// Saves the state for a session, creating it if needed.
    async fn save(
        &self,
        session_id: SessionId,
        state: ConversationState,
    ) -> Result<(), SessionStoreError>;
}
