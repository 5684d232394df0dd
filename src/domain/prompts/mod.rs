//! Prompt templates and the builders that fill them.
//!
//! Templates are loaded by name from a template store. Every builder takes
//! the template as an `Option` and falls back to an inline prompt when it
//! could not be loaded.

mod builders;
mod template;

pub use builders::{
    classifier_prompt, direct_answer_prompt, expansion_prompt, knowledge_excerpt, router_prompt,
    sql_prompt, SynthesisPrompt, RESULT_EXCERPT_CHARS,
};
pub use template::render;

/// Template names known to the assistant.
pub mod names {
    pub const INTENT_CLASSIFIER: &str = "intent_classifier.txt";
    pub const ROUTER: &str = "router.txt";
    pub const SUMMARIZER: &str = "summarizer.txt";
}
