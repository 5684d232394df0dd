//! Text Generator Adapters.
//!
//! ## Available Adapters
//!
//! - `OllamaTextGenerator` - Ollama server, streamed `/api/generate`
//! - `MockTextGenerator` - Configurable mock for testing

mod mock_generator;
mod ollama_generator;

pub use mock_generator::MockTextGenerator;
pub use ollama_generator::{OllamaConfig, OllamaTextGenerator};
