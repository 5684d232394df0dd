//! Filesystem template store.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{TemplateError, TemplateStore};

/// Loads prompt templates from `{base_dir}/{name}`, trimmed.
pub struct FileTemplateStore {
    base_dir: PathBuf,
}

impl FileTemplateStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Template names are plain file names; anything else is never found.
    fn path_for(&self, name: &str) -> Option<PathBuf> {
        let plain = !name.is_empty()
            && !name.contains(|c: char| c == '/' || c == '\\')
            && name != ".."
            && name != ".";
        plain.then(|| self.base_dir.join(name))
    }
}

#[async_trait]
impl TemplateStore for FileTemplateStore {
    async fn load(&self, name: &str) -> Result<String, TemplateError> {
        let path = self
            .path_for(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;

        match fs::read_to_string(&path).await {
            Ok(content) => Ok(content.trim().to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(TemplateError::NotFound(name.to_string())),
            Err(e) => Err(TemplateError::Unreadable {
                name: name.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
