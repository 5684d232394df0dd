//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers and value objects shared by the routing,
//! conversation and query modules.

mod ids;
mod timestamp;

pub use ids::SessionId;
pub use timestamp::Timestamp;
