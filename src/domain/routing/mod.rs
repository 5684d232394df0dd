//! Query Routing Module
//!
//! Decides which of the two relational schemas a question should be answered
//! from, and whether adjacent project or mutation data is needed.
//!
//! - `DatabaseId` - The two queryable schemas
//! - `RoutingDecision` - Typed outcome of a routing pass
//! - `LexiconRouter` - Keyword-membership classifier, the first routing tier

mod database;
mod decision;
mod lexicon;

pub use database::DatabaseId;
pub use decision::{RoutingDecision, RoutingMode, TargetDatabase};
pub use lexicon::{Lexicon, LexiconRouter};
