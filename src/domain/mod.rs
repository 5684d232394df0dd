//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps)
//! - `routing` - Keyword lexicon router and routing decisions
//! - `extraction` - Tolerant parsing of structured model output
//! - `conversation` - Bounded conversation memory and intent decisions
//! - `query` - Result rows, identifier extraction and enrichment SQL
//! - `prompts` - Prompt templates and builders

pub mod conversation;
pub mod extraction;
pub mod foundation;
pub mod prompts;
pub mod query;
pub mod routing;
