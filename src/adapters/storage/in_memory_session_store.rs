//! In-Memory Session Store Adapter
//!
//! Keeps one conversation state per session in memory, with idle expiry and
//! a cap on the number of live sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{SessionStore, SessionStoreError};

#[derive(Debug, Clone)]
struct Entry {
    state: ConversationState,
    touched: Timestamp,
}

/// In-memory storage for conversation sessions
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Entry>>>,
    /// Idle seconds after which a session expires.
    ttl_secs: u64,
    /// Live sessions kept before the least recently saved one is evicted.
    max_sessions: usize,
}

impl InMemorySessionStore {
    /// Create a new store
    pub fn new(ttl_secs: u64, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl_secs,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Drops every session idle at `now`. Returns how many were dropped.
    pub async fn evict_expired_at(&self, now: Timestamp) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        before - sessions.len()
    }

    /// Number of stored sessions, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn is_expired(&self, entry: &Entry, now: Timestamp) -> bool {
        entry.touched.plus_secs(self.ttl_secs).is_before(&now)
    }

    async fn save_at(&self, session_id: SessionId, state: ConversationState, now: Timestamp) {
        let mut sessions = self.sessions.write().await;

        if !sessions.contains_key(&session_id) && sessions.len() >= self.max_sessions {
            sessions.retain(|_, entry| !self.is_expired(entry, now));

            if sessions.len() >= self.max_sessions {
                let oldest = sessions
                    .iter()
                    .min_by_key(|(_, entry)| entry.touched)
                    .map(|(id, _)| *id);
                if let Some(id) = oldest {
                    tracing::debug!(session_id = %id, "Evicting least recently used session");
                    sessions.remove(&id);
                }
            }
        }

        sessions.insert(
            session_id,
            Entry {
                state,
                touched: now,
            },
        );
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(3600, 1000)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: SessionId) -> Result<ConversationState, SessionStoreError> {
        let sessions = self.sessions.read().await;
        match sessions.get(&session_id) {
            Some(entry) if !self.is_expired(entry, Timestamp::now()) => Ok(entry.state.clone()),
            _ => Err(SessionStoreError::NotFound(session_id)),
        }
    }

    async fn save(
        &self,
        session_id: SessionId,
        state: ConversationState,
    ) -> Result<(), SessionStoreError> {
        self.save_at(session_id, state, Timestamp::now()).await;
        Ok(())
    }
}
