//! Prompt builders for each model call a turn can make.

use serde::Serialize;

use super::render;
use crate::domain::query::QueryResultSet;
use crate::domain::routing::DatabaseId;

/// Characters of serialized rows kept in the synthesis prompt per section.
pub const RESULT_EXCERPT_CHARS: usize = 2000;

const KNOWLEDGE_MARKER: &str = "KEY KNOWLEDGE BASE:";

const INLINE_CLASSIFIER: &str = r#"Classify the user's message for a protein modification research assistant.

CONVERSATION HISTORY:
{context}

CURRENT CONTEXT:
{current_context}

USER MESSAGE: {user_query}

Reply with a single JSON object with the fields "intent" (SOCIAL, INFORMATIONAL, CONTEXTUAL or RESEARCH), "action" (DIRECT_RESPONSE, EXPAND_PREVIOUS, CLARIFY or DATABASE_SEARCH), "confidence", and, when relevant, "direct_response", "expansion_topic", "resolved_query", "entities_mentioned" and "topics_mentioned"."#;

const INLINE_SUMMARIZER: &str = "You are an assistant for protein modification research. \
Answer the user's query using only the data and context below. \
If no data was found, say so plainly.";

/// Fills the intent classification template.
pub fn classifier_prompt(
    template: Option<&str>,
    context: &str,
    current_context: &str,
    user_query: &str,
) -> String {
    render(
        template.unwrap_or(INLINE_CLASSIFIER),
        &[
            ("context", context),
            ("current_context", current_context),
            ("user_query", user_query),
        ],
    )
}

/// Fills the model router template.
pub fn router_prompt(template: &str, user_query: &str) -> String {
    render(template, &[("user_query", user_query)])
}

/// Fills a SQL generation template for one database.
pub fn sql_prompt(template: Option<&str>, user_query: &str, db: DatabaseId) -> String {
    match template {
        Some(t) => render(t, &[("user_query", user_query), ("database", db.as_str())]),
        None => format!(
            "Generate a simple SQL query for {} database based on: {}",
            db, user_query
        ),
    }
}

/// Asks the model to elaborate strictly on its previous answer.
pub fn expansion_prompt(previous_response: &str) -> String {
    format!(
        "The user asked for more information about a topic we were discussing. \
Here's what I told them previously:

PREVIOUS RESPONSE: {previous_response}

USER REQUEST: More information / elaboration

Provide additional helpful details about the same topic, building naturally on what was \
already discussed. Be conversational and informative. Focus on expanding the specific points \
that were mentioned.

IMPORTANT: Only reference what is shown in the previous response above. Do not invent or \
assume other discussions.

Response:"
    )
}

/// The reference-knowledge section of the summarizer template.
///
/// Everything from the knowledge marker onwards, or the whole template when
/// the marker is absent.
pub fn knowledge_excerpt(summarizer: &str) -> &str {
    match summarizer.find(KNOWLEDGE_MARKER) {
        Some(start) => &summarizer[start..],
        None => summarizer,
    }
}

/// Grounded direct answer prompt.
pub fn direct_answer_prompt(knowledge: Option<&str>, user_query: &str) -> String {
    let knowledge = knowledge
        .map(|k| format!("{}\n\n", k))
        .unwrap_or_default();
    format!(
        "You are an AI assistant who can understand the proteomics field well enough to answer \
user questions enthusiastically.

{knowledge}USER QUERY: {user_query}

INSTRUCTIONS:
- Provide a direct, factual answer to the user's question
- Use the specialized knowledge base above when relevant
- Be conversational and helpful
- If the question relates to protein modifications, databases, or proteomics concepts covered \
in the knowledge base, reference that information
- Keep the response focused and informative

Response:"
    )
}

/// Inputs of the final answer prompt.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisPrompt<'a> {
    pub user_query: &'a str,
    /// Prior turns, `None` for a standalone query.
    pub context: Option<&'a str>,
    pub results: &'a QueryResultSet,
    pub projects: &'a QueryResultSet,
    pub mutations: &'a QueryResultSet,
}

impl SynthesisPrompt<'_> {
    /// Data sections in order, each either an excerpt or a "none found" marker.
    pub fn sections(&self) -> Vec<String> {
        let mut sections = vec![format!("USER QUERY: {}", self.user_query)];

        sections.push(match self.context {
            Some(ctx) => format!("CONVERSATION CONTEXT (reference this if relevant):\n{}", ctx),
            None => "CONVERSATION CONTEXT: None - treat as standalone query".to_string(),
        });

        sections.push(data_section(
            "DATABASE RESULTS",
            self.results,
            "No results found in the database for this query.",
        ));
        sections.push(data_section(
            "PROJECT INFORMATION",
            self.projects,
            "No project information found.",
        ));
        sections.push(data_section(
            "MUTATION DATA",
            self.mutations,
            "No mutation data found.",
        ));

        sections
    }

    /// Base template followed by the data sections.
    pub fn build(&self, base_template: Option<&str>) -> String {
        format!(
            "{}\n\n{}",
            base_template.unwrap_or(INLINE_SUMMARIZER),
            self.sections().join("\n\n")
        )
    }
}

fn data_section(title: &str, data: &QueryResultSet, empty_marker: &str) -> String {
    if data.values().all(Vec::is_empty) {
        return format!("{}: {}", title, empty_marker);
    }
    format!("{}:\n{}", title, json_excerpt(data, RESULT_EXCERPT_CHARS))
}

/// Pretty JSON cut to at most `max_chars` characters.
fn json_excerpt<T: Serialize>(value: &T, max_chars: usize) -> String {
    let json = serde_json::to_string_pretty(value).unwrap_or_default();
    match json.char_indices().nth(max_chars) {
        Some((cut, _)) => json[..cut].to_string(),
        None => json,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(db: DatabaseId, n: usize) -> QueryResultSet {
        let mut set = QueryResultSet::new();
        let rows = (0..n)
            .map(|i| json!({"id": i, "protein_name": "TP53"}).as_object().cloned().unwrap())
            .collect();
        set.insert(db, rows);
        set
    }

    #[test]
    fn classifier_prompt_fills_template() {
        let prompt = classifier_prompt(
            Some("{context}|{current_context}|{user_query}"),
            "No previous conversation",
            "None",
            "Hi",
        );
        assert_eq!(prompt, "No previous conversation|None|Hi");
    }

    #[test]
    fn classifier_prompt_without_template_still_names_fields() {
        let prompt = classifier_prompt(None, "ctx", "None", "What is SUMO?");
        assert!(prompt.contains("USER MESSAGE: What is SUMO?"));
        assert!(prompt.contains("\"intent\""));
    }

    #[test]
    fn sql_prompt_falls_back_inline() {
        assert_eq!(
            sql_prompt(None, "p53 sites", DatabaseId::Scop3ptm),
            "Generate a simple SQL query for scop3ptm database based on: p53 sites"
        );
        assert_eq!(
            sql_prompt(Some("{database}: {user_query}"), "q", DatabaseId::Scop3p),
            "scop3p: q"
        );
    }

    #[test]
    fn knowledge_starts_at_marker() {
        let template = "Intro text.\nKEY KNOWLEDGE BASE:\n- SUMO is a small modifier";
        assert_eq!(
            knowledge_excerpt(template),
            "KEY KNOWLEDGE BASE:\n- SUMO is a small modifier"
        );
        assert_eq!(knowledge_excerpt("no marker"), "no marker");
    }

    #[test]
    fn direct_prompt_embeds_knowledge_and_query() {
        let prompt = direct_answer_prompt(Some("KEY KNOWLEDGE BASE: x"), "What is a PTM?");
        assert!(prompt.contains("KEY KNOWLEDGE BASE: x\n\nUSER QUERY: What is a PTM?"));
        let bare = direct_answer_prompt(None, "q");
        assert!(bare.contains("enthusiastically.\n\nUSER QUERY: q"));
    }

    #[test]
    fn expansion_prompt_quotes_previous_response() {
        let prompt = expansion_prompt("Serine 15 is phosphorylated.");
        assert!(prompt.contains("PREVIOUS RESPONSE: Serine 15 is phosphorylated."));
        assert!(prompt.contains("Only reference what is shown"));
    }

    #[test]
    fn synthesis_marks_empty_sections() {
        let empty = QueryResultSet::new();
        let mut failed = QueryResultSet::new();
        failed.insert(DatabaseId::Scop3p, Vec::new());
        failed.insert(DatabaseId::Scop3ptm, Vec::new());

        let prompt = SynthesisPrompt {
            user_query: "p53",
            context: None,
            results: &failed,
            projects: &empty,
            mutations: &empty,
        }
        .build(Some("BASE"));

        assert!(prompt.starts_with("BASE\n\nUSER QUERY: p53"));
        assert!(prompt.contains("CONVERSATION CONTEXT: None - treat as standalone query"));
        assert!(prompt.contains("DATABASE RESULTS: No results found in the database for this query."));
        assert!(prompt.contains("PROJECT INFORMATION: No project information found."));
        assert!(prompt.contains("MUTATION DATA: No mutation data found."));
    }

    #[test]
    fn synthesis_includes_rows_and_context() {
        let results = rows(DatabaseId::Scop3ptm, 2);
        let empty = QueryResultSet::new();
        let sections = SynthesisPrompt {
            user_query: "p53",
            context: Some("User: Hi\nBot: Hello!..."),
            results: &results,
            projects: &empty,
            mutations: &empty,
        }
        .sections();

        assert_eq!(sections.len(), 5);
        assert!(sections[1].starts_with("CONVERSATION CONTEXT (reference this if relevant):\nUser: Hi"));
        assert!(sections[2].starts_with("DATABASE RESULTS:\n{"));
        assert!(sections[2].contains("\"scop3ptm\""));
    }

    #[test]
    fn synthesis_excerpt_is_capped() {
        let results = rows(DatabaseId::Scop3p, 500);
        let empty = QueryResultSet::new();
        let sections = SynthesisPrompt {
            user_query: "q",
            context: None,
            results: &results,
            projects: &empty,
            mutations: &empty,
        }
        .sections();

        let excerpt = sections[2].trim_start_matches("DATABASE RESULTS:\n");
        assert_eq!(excerpt.chars().count(), RESULT_EXCERPT_CHARS);
    }
}
