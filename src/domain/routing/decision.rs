//! Routing decision value objects.

use serde::{Deserialize, Serialize};

use super::DatabaseId;

/// How a routing decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    /// The keyword lexicon settled the target.
    RuleBased,
    /// The lexicon was inconclusive; the text-generation router decides.
    ModelBased,
}

/// Which database(s) a query should run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetDatabase {
    Scop3p,
    Scop3ptm,
    Both,
    None,
}

impl TargetDatabase {
    /// Parses the `db` value emitted by the model router.
    ///
    /// Unrecognised values, `null` and `"none"` all mean no database.
    pub fn from_router_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "both" => TargetDatabase::Both,
            Some(v) if v == "scop3p" => TargetDatabase::Scop3p,
            Some(v) if v == "scop3ptm" => TargetDatabase::Scop3ptm,
            _ => TargetDatabase::None,
        }
    }

    /// Databases covered by this target, in query order.
    pub fn databases(&self) -> Vec<DatabaseId> {
        match self {
            TargetDatabase::Scop3p => vec![DatabaseId::Scop3p],
            TargetDatabase::Scop3ptm => vec![DatabaseId::Scop3ptm],
            TargetDatabase::Both => DatabaseId::ALL.to_vec(),
            TargetDatabase::None => Vec::new(),
        }
    }
}

/// Outcome of one routing pass. Produced per domain query, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub mode: RoutingMode,
    pub target: TargetDatabase,
    pub needs_projects: bool,
    pub needs_mutations: bool,
}

impl RoutingDecision {
    /// A lexicon-settled decision.
    pub fn rule_based(target: TargetDatabase, needs_projects: bool, needs_mutations: bool) -> Self {
        Self {
            mode: RoutingMode::RuleBased,
            target,
            needs_projects,
            needs_mutations,
        }
    }

    /// A decision deferred to (or produced by) the model router.
    pub fn model_based(target: TargetDatabase, needs_projects: bool, needs_mutations: bool) -> Self {
        Self {
            mode: RoutingMode::ModelBased,
            target,
            needs_projects,
            needs_mutations,
        }
    }

    /// Used when the model router could not be consulted or understood.
    pub fn query_everything() -> Self {
        Self::rule_based(TargetDatabase::Both, false, false)
    }

    /// Returns true if the model router should be consulted.
    pub fn is_ambiguous(&self) -> bool {
        self.mode == RoutingMode::ModelBased && self.target == TargetDatabase::None
    }
}
