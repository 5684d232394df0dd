//! Domain query handlers.

mod run_domain_query;

pub use run_domain_query::{RunDomainQueryHandler, SYNTHESIS_MAX_TOKENS};
