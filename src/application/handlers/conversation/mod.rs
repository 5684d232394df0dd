//! Conversation handlers.
//!
//! - `HandleQueryHandler` - One full turn, the entry point for delivery surfaces
//! - `ClassifyIntentHandler` - Intent classification with keyword fallback
//! - `DirectResponseHandler` - Knowledge-grounded answers
//! - `ExpandPreviousHandler` - Follow-ups on the previous answer

mod classify_intent;
mod direct_response;
mod expand_previous;
mod handle_query;

pub use classify_intent::{ClassifyIntentHandler, CLASSIFIER_MAX_TOKENS};
pub use direct_response::{DirectResponseHandler, DIRECT_ANSWER_MAX_TOKENS};
pub use expand_previous::{ExpandPreviousHandler, EXPANSION_MAX_TOKENS};
pub use handle_query::{HandleQueryHandler, TurnOutcome};
