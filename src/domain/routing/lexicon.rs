//! Keyword lexicon router.
//!
//! First routing tier: plain case-insensitive substring membership against
//! four fixed term sets. Deterministic and total over all inputs.

use super::{RoutingDecision, TargetDatabase};

/// The four keyword sets consulted by the router.
#[derive(Debug, Clone, Copy)]
pub struct Lexicon {
    /// Modification types that live in the PTM-centric schema.
    pub modification_terms: &'static [&'static str],
    /// Phosphosite vocabulary shared by both schemas.
    pub phospho_site_terms: &'static [&'static str],
    /// Project and experiment metadata.
    pub project_terms: &'static [&'static str],
    /// Mutation and variant vocabulary.
    pub mutation_terms: &'static [&'static str],
}

const MODIFICATION_TERMS: &[&str] = &[
    "ptm",
    "post-translational",
    "ubiquitin",
    "acetyl",
    "methyl",
    "glyco",
    "sumoyl",
    "neddyl",
    "palmitoyl",
];

const PHOSPHO_SITE_TERMS: &[&str] = &["phosphosite", "p-site", "phosphorylation site"];

const PROJECT_TERMS: &[&str] = &[
    "pxd",
    "proteomexchange",
    "pride",
    "tissue",
    "instrument",
    "experiment",
    "publication",
    "disease",
    "pathology",
    "relevance",
    "affect",
];

const MUTATION_TERMS: &[&str] = &["mutation", "variant", "humsavar", "disease-associated"];

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            modification_terms: MODIFICATION_TERMS,
            phospho_site_terms: PHOSPHO_SITE_TERMS,
            project_terms: PROJECT_TERMS,
            mutation_terms: MUTATION_TERMS,
        }
    }
}

fn mentions_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| haystack.contains(t))
}

/// Keyword-membership classifier producing a coarse routing guess.
#[derive(Debug, Clone, Default)]
pub struct LexiconRouter {
    lexicon: Lexicon,
}

impl LexiconRouter {
    /// Creates a router over the built-in lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies a query.
    ///
    /// Phosphosite terms win over modification terms. Enrichment flags are
    /// computed independently of the target and are always reported.
    pub fn classify(&self, query: &str) -> RoutingDecision {
        if query.is_empty() {
            return RoutingDecision::model_based(TargetDatabase::None, false, false);
        }

        let q = query.to_lowercase();
        let needs_projects = mentions_any(&q, self.lexicon.project_terms);
        let needs_mutations = mentions_any(&q, self.lexicon.mutation_terms);

        if mentions_any(&q, self.lexicon.phospho_site_terms) {
            return RoutingDecision::rule_based(TargetDatabase::Both, needs_projects, needs_mutations);
        }
        if mentions_any(&q, self.lexicon.modification_terms) {
            return RoutingDecision::rule_based(
                TargetDatabase::Scop3ptm,
                needs_projects,
                needs_mutations,
            );
        }

        RoutingDecision::model_based(TargetDatabase::None, needs_projects, needs_mutations)
    }
}
