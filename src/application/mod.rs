//! Application layer - Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    ClassifyIntentHandler, DirectResponseHandler, ExpandPreviousHandler, HandleQueryHandler,
    RunDomainQueryHandler, TurnOutcome,
};
