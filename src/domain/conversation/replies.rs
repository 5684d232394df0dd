//! Fixed user-facing replies.

/// Greeting used by the keyword classifier for social messages.
pub const GREETING_REPLY: &str =
    "Hello! I am here to help you with protein modification research. What would you like to know?";

/// Last-resort direct answer when neither the model nor the classifier supplied one.
pub const DEFAULT_DIRECT_REPLY: &str =
    "Hello! I'm here to help with your protein modification research. What would you like to know?";

/// Placeholder answer attached to informational questions by the keyword classifier.
pub const EXPLAIN_REPLY: &str = "Let me explain that for you.";

pub const CLARIFY_REPLY: &str = "Could you please be more specific about what you'd like to know?";

pub const NOTHING_TO_EXPAND_REPLY: &str =
    "I'd be happy to provide more information, but I'm not sure what specific topic you'd like me to expand on.";

pub const AFTER_GREETING_EXPAND_REPLY: &str =
    "Of course! I'm here to help with any questions you have. What specific topic would you like to know more about?";

pub const SHORT_PREVIOUS_EXPAND_REPLY: &str =
    "I'd be happy to provide more details. What specific aspect would you like me to elaborate on?";

pub const EXPAND_UNAVAILABLE_REPLY: &str =
    "I'd be happy to provide more details, but I'm having trouble accessing additional information right now. Could you ask a more specific question?";

/// Apology returned when the final answer could not be generated.
pub fn query_failed_reply(query: &str) -> String {
    format!(
        "I encountered an error processing your query: {}. Please try rephrasing your question.",
        query
    )
}
