//! Adapters - Implementations of ports for external systems.
//!
//! - `ai` - Ollama text generation and a scripted mock
//! - `database` - PostgreSQL execution and a scripted mock
//! - `templates` - Prompt templates from disk or memory
//! - `storage` - In-memory session store
//! - `http` - axum delivery surface

pub mod ai;
pub mod database;
pub mod http;
pub mod storage;
pub mod templates;
