//! Prompt template stores.
//!
//! - `FileTemplateStore` - Templates on disk (the shipped `prompts/` directory)
//! - `InMemoryTemplateStore` - Templates held in memory (testing)

mod file_template_store;
mod in_memory_template_store;

pub use file_template_store::FileTemplateStore;
pub use in_memory_template_store::InMemoryTemplateStore;
