//! RunDomainQueryHandler - Answers a research question from the databases.
//!
//! Routing, SQL generation, execution, enrichment and synthesis. Every step is
//! isolated: a failed model call or statement degrades that step to an empty
//! result and the pipeline carries on to synthesis.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::handlers::templates::load_optional;
use crate::domain::conversation::{query_failed_reply, ConversationState};
use crate::domain::extraction::{clean_sql_response, parse_decision};
use crate::domain::prompts::{names, router_prompt, sql_prompt, SynthesisPrompt};
use crate::domain::query::{extract_protein_ids, has_rows, EnrichmentKind, QueryResultSet, Row};
use crate::domain::routing::{DatabaseId, LexiconRouter, RoutingDecision, TargetDatabase};
use crate::ports::{GenerationRequest, SqlExecutor, TemplateStore, TextGenerator};

/// Output budget of the synthesis call.
pub const SYNTHESIS_MAX_TOKENS: u32 = 800;

const ROUTER_REQUIRED_FIELDS: [&str; 2] = ["mode", "db"];

/// Handler for the database-backed answer pipeline.
pub struct RunDomainQueryHandler {
    generator: Arc<dyn TextGenerator>,
    executor: Arc<dyn SqlExecutor>,
    templates: Arc<dyn TemplateStore>,
    router: LexiconRouter,
}

impl RunDomainQueryHandler {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        executor: Arc<dyn SqlExecutor>,
        templates: Arc<dyn TemplateStore>,
    ) -> Self {
        Self {
            generator,
            executor,
            templates,
            router: LexiconRouter::new(),
        }
    }

    /// Runs the pipeline for `query`. `state` supplies the prior turns only;
    /// the caller records the exchange afterwards.
    pub async fn handle(&self, state: &ConversationState, query: &str) -> String {
        info!(query, "Starting domain query");

        let routing = self.route(query).await;
        info!(
            mode = ?routing.mode,
            target = ?routing.target,
            needs_projects = routing.needs_projects,
            needs_mutations = routing.needs_mutations,
            "Routing decided"
        );

        let results = self.fetch_primary(query, routing.target).await;
        let total_rows: usize = results.values().map(Vec::len).sum();
        info!(total_rows, "Primary queries finished");

        let projects = if routing.needs_projects {
            self.enrich(EnrichmentKind::Projects, &results).await
        } else {
            QueryResultSet::new()
        };
        let mutations = if routing.needs_mutations {
            self.enrich(EnrichmentKind::Mutations, &results).await
        } else {
            QueryResultSet::new()
        };

        let context = state.has_history().then(|| state.context_summary());
        let synthesis = SynthesisPrompt {
            user_query: query,
            context: context.as_deref(),
            results: &results,
            projects: &projects,
            mutations: &mutations,
        };
        self.synthesize(query, &synthesis).await
    }

    /// Lexicon first; the model router only when the lexicon is inconclusive.
    async fn route(&self, query: &str) -> RoutingDecision {
        let lexical = self.router.classify(query);
        if !lexical.is_ambiguous() {
            return lexical;
        }

        let Some(template) = load_optional(self.templates.as_ref(), names::ROUTER).await else {
            warn!("Router template unavailable, querying every database");
            return RoutingDecision::query_everything();
        };

        let request = GenerationRequest::new(router_prompt(&template, query));
        let raw = match self.generator.generate(request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Router call failed, querying every database");
                return RoutingDecision::query_everything();
            }
        };
        debug!(raw = %raw, "Router response");

        match parse_decision(&raw, &ROUTER_REQUIRED_FIELDS) {
            Ok(parsed) => RoutingDecision::model_based(
                TargetDatabase::from_router_value(parsed.str_field("db")),
                parsed
                    .bool_field("needs_projects")
                    .unwrap_or(lexical.needs_projects),
                parsed
                    .bool_field("needs_mutations")
                    .unwrap_or(lexical.needs_mutations),
            ),
            Err(failure) => {
                warn!(error = %failure, "Router output unusable, querying every database");
                RoutingDecision::query_everything()
            }
        }
    }

    async fn fetch_primary(&self, query: &str, target: TargetDatabase) -> QueryResultSet {
        let mut results = QueryResultSet::new();
        for db in target.databases() {
            let rows = self.generate_and_run(query, db).await;
            results.insert(db, rows);
        }
        results
    }

    /// One SQL generation call and at most one statement for `db`.
    async fn generate_and_run(&self, query: &str, db: DatabaseId) -> Vec<Row> {
        let template = load_optional(self.templates.as_ref(), db.sql_template()).await;
        let request = GenerationRequest::new(sql_prompt(template.as_deref(), query, db));

        let sql = match self.generator.generate(request).await {
            Ok(raw) => clean_sql_response(&raw),
            Err(e) => {
                warn!(database = %db, error = %e, "SQL generation failed");
                return Vec::new();
            }
        };
        if sql.trim().is_empty() {
            warn!(database = %db, "Empty SQL generated");
            return Vec::new();
        }
        info!(database = %db, sql = %sql, "Generated SQL");

        match self.executor.execute(db, &sql).await {
            Ok(rows) => {
                info!(database = %db, rows = rows.len(), "Query executed");
                rows
            }
            Err(e) => {
                warn!(database = %db, error = %e, "Query failed");
                Vec::new()
            }
        }
    }

    /// Runs the fixed enrichment query for every database that was queried.
    async fn enrich(&self, kind: EnrichmentKind, results: &QueryResultSet) -> QueryResultSet {
        let mut enriched = QueryResultSet::new();
        for (&db, rows) in results {
            let ids = extract_protein_ids(rows);
            debug!(database = %db, kind = kind.as_str(), ids = ids.len(), "Extracted protein ids");

            let rows = match kind.sql(db, &ids) {
                Some(sql) => match self.executor.execute(db, &sql).await {
                    Ok(rows) => {
                        info!(database = %db, kind = kind.as_str(), rows = rows.len(), "Enrichment fetched");
                        rows
                    }
                    Err(e) => {
                        warn!(database = %db, kind = kind.as_str(), error = %e, "Enrichment failed");
                        Vec::new()
                    }
                },
                None => Vec::new(),
            };
            enriched.insert(db, rows);
        }
        enriched
    }

    async fn synthesize(&self, query: &str, synthesis: &SynthesisPrompt<'_>) -> String {
        let base = load_optional(self.templates.as_ref(), names::SUMMARIZER).await;
        let prompt = synthesis.build(base.as_deref());
        info!(
            prompt_len = prompt.len(),
            has_results = has_rows(synthesis.results),
            "Synthesizing answer"
        );

        let request = GenerationRequest::new(prompt).with_max_output_tokens(SYNTHESIS_MAX_TOKENS);
        match self.generator.generate(request).await {
            Ok(answer) => {
                info!(response_len = answer.len(), "Answer synthesized");
                answer
            }
            Err(e) => {
                warn!(error = %e, "Synthesis failed");
                query_failed_reply(query)
            }
        }
    }
}
