//! Optional template loading shared by the handlers.

use tracing::{debug, warn};

use crate::ports::{TemplateError, TemplateStore};

/// Loads a template, logging and returning `None` when it is unavailable.
///
/// Callers fall back to an inline prompt.
pub(crate) async fn load_optional(store: &dyn TemplateStore, name: &str) -> Option<String> {
    match store.load(name).await {
        Ok(template) => Some(template),
        Err(TemplateError::NotFound(_)) => {
            debug!(template = name, "Template not found, using inline prompt");
            None
        }
        Err(e) => {
            warn!(template = name, error = %e, "Template unreadable, using inline prompt");
            None
        }
    }
}
