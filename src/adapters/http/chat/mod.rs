//! HTTP adapter for the chat endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatRequest, ChatResponse, ErrorResponse, HealthResponse, ResetRequest, ResetResponse,
    SERVICE_NAME,
};
pub use handlers::ChatHandlers;
pub use routes::chat_routes;
