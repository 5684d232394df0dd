//! DirectResponseHandler - Answers without touching the databases.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::handlers::templates::load_optional;
use crate::domain::conversation::DEFAULT_DIRECT_REPLY;
use crate::domain::prompts::{direct_answer_prompt, knowledge_excerpt, names};
use crate::ports::{GenerationRequest, TemplateStore, TextGenerator};

/// Output budget of the direct answer call.
pub const DIRECT_ANSWER_MAX_TOKENS: u32 = 400;

/// Handler for social and general-knowledge messages.
///
/// The answer is grounded on the knowledge section of the summarizer template.
pub struct DirectResponseHandler {
    generator: Arc<dyn TextGenerator>,
    templates: Arc<dyn TemplateStore>,
}

impl DirectResponseHandler {
    pub fn new(generator: Arc<dyn TextGenerator>, templates: Arc<dyn TemplateStore>) -> Self {
        Self {
            generator,
            templates,
        }
    }

    /// Falls back to the classifier's own answer, then to a fixed greeting.
    pub async fn handle(&self, query: &str, classifier_answer: Option<&str>) -> String {
        let summarizer = load_optional(self.templates.as_ref(), names::SUMMARIZER).await;
        let prompt = direct_answer_prompt(summarizer.as_deref().map(knowledge_excerpt), query);

        let request = GenerationRequest::new(prompt).with_max_output_tokens(DIRECT_ANSWER_MAX_TOKENS);
        match self.generator.generate(request).await {
            Ok(answer) => {
                info!(response_len = answer.len(), "Direct answer generated");
                answer
            }
            Err(e) => {
                warn!(error = %e, "Direct answer failed, using classifier answer");
                classifier_answer.unwrap_or(DEFAULT_DIRECT_REPLY).to_string()
            }
        }
    }
}
