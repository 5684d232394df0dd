//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TextGenerator` - Prompt in, completion out
//! - `SqlExecutor` - SQL in, rows out, per database
//! - `TemplateStore` - Prompt templates by name
//! - `SessionStore` - Conversation state per session

mod session_store;
mod sql_executor;
mod template_store;
mod text_generator;

pub use session_store::{SessionStore, SessionStoreError};
pub use sql_executor::{QueryError, SqlExecutor};
pub use template_store::{TemplateError, TemplateStore};
pub use text_generator::{GenerationError, GenerationRequest, TextGenerator};
