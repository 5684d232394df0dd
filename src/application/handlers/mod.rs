//! Application handlers.
//!
//! Handlers orchestrate domain operations over the ports. None of them return
//! errors: failures at a port degrade the step and are logged.

pub mod conversation;
pub mod domain_query;
mod templates;

pub use conversation::{
    ClassifyIntentHandler, DirectResponseHandler, ExpandPreviousHandler, HandleQueryHandler,
    TurnOutcome,
};
pub use domain_query::RunDomainQueryHandler;
