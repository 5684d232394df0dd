//! Conversation state.
//!
//! Holds a bounded FIFO of completed exchanges plus the context carried
//! between turns. The state is owned by exactly one session and is only
//! mutated after a turn completes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};

use crate::domain::foundation::Timestamp;

/// Default number of exchanges remembered per session.
pub const DEFAULT_MAX_HISTORY: usize = 4;

/// Exchanges rendered into the context summary.
const SUMMARY_EXCHANGES: usize = 2;

/// Characters of each bot response kept in the context summary.
const SUMMARY_RESPONSE_CHARS: usize = 300;

/// One completed turn. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub user_query: String,
    pub bot_response: String,
    pub timestamp: Timestamp,
}

impl Exchange {
    pub fn new(user_query: impl Into<String>, bot_response: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            bot_response: bot_response.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// Keys of the carried context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKey {
    RecentEntities,
    RecentTopics,
}

/// Short-term memory of a single conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    history: VecDeque<Exchange>,
    capacity: usize,
    last_query: Option<String>,
    last_response: Option<String>,
    current_context: BTreeMap<ContextKey, Vec<Value>>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    /// Creates an empty state with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }

    /// Creates an empty state remembering at most `capacity` exchanges.
    ///
    /// A capacity of zero is raised to one so the last turn is always
    /// available for expansion.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            last_query: None,
            last_response: None,
            current_context: BTreeMap::new(),
        }
    }

    /// Records a completed turn, evicting the oldest exchange when full.
    pub fn record(&mut self, user_query: impl Into<String>, bot_response: impl Into<String>) {
        let exchange = Exchange::new(user_query, bot_response);
        self.last_query = Some(exchange.user_query.clone());
        self.last_response = Some(exchange.bot_response.clone());

        self.history.push_back(exchange);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    /// Renders the last two exchanges for prompts.
    pub fn context_summary(&self) -> String {
        if self.history.is_empty() {
            return "No previous conversation".to_string();
        }

        let skip = self.history.len().saturating_sub(SUMMARY_EXCHANGES);
        self.history
            .iter()
            .skip(skip)
            .flat_map(|exchange| {
                let response: String = exchange
                    .bot_response
                    .chars()
                    .take(SUMMARY_RESPONSE_CHARS)
                    .collect();
                [
                    format!("User: {}", exchange.user_query),
                    format!("Bot: {}...", response),
                ]
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Pretty JSON of the carried context, or `None` when nothing is carried.
    pub fn current_context_json(&self) -> String {
        if self.current_context.is_empty() {
            return "None".to_string();
        }
        serde_json::to_string_pretty(&self.current_context).unwrap_or_else(|_| "None".to_string())
    }

    /// Replaces the carried value for `key`.
    pub fn merge_context(&mut self, key: ContextKey, values: Vec<Value>) {
        self.current_context.insert(key, values);
    }

    pub fn context_value(&self, key: ContextKey) -> Option<&[Value]> {
        self.current_context.get(&key).map(Vec::as_slice)
    }

    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    /// Exchanges in recording order, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Exchange> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    /// Replaces the whole state with a fresh one of the same capacity.
    pub fn reset(&mut self) {
        *self = Self::with_capacity(self.capacity);
    }
}
