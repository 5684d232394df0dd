//! Conversation domain module.
//!
//! Bounded per-session memory and the typed decisions a turn can resolve to.

mod expansion;
mod fallback;
mod intent;
mod replies;
mod state;

pub use expansion::ExpansionPlan;
pub use fallback::fallback_decision;
pub use intent::{Intent, IntentAction, IntentDecision, DEFAULT_CONFIDENCE};
pub use replies::*;
pub use state::{ContextKey, ConversationState, Exchange, DEFAULT_MAX_HISTORY};
