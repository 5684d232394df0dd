//! HTTP handlers for chat endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use crate::application::handlers::HandleQueryHandler;
use crate::domain::conversation::ConversationState;
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

use super::dto::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, ResetRequest, ResetResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    turn_handler: Arc<HandleQueryHandler>,
    sessions: Arc<dyn SessionStore>,
    max_history: usize,
}

impl ChatHandlers {
    pub fn new(
        turn_handler: Arc<HandleQueryHandler>,
        sessions: Arc<dyn SessionStore>,
        max_history: usize,
    ) -> Self {
        Self {
            turn_handler,
            sessions,
            max_history,
        }
    }

    /// Loads a session, starting a fresh one when it is unknown or expired.
    async fn load_or_new(&self, session_id: SessionId) -> Result<ConversationState, SessionStoreError> {
        match self.sessions.load(session_id).await {
            Ok(state) => Ok(state),
            Err(SessionStoreError::NotFound(_)) => {
                debug!(%session_id, "Starting new conversation");
                Ok(ConversationState::with_capacity(self.max_history))
            }
            Err(e) => Err(e),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /chat - Run one conversational turn
pub async fn chat(
    State(handlers): State<ChatHandlers>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return body_rejected(rejection),
    };
    let query = req.query.trim();
    if query.is_empty() {
        return bad_request("Query is required");
    }

    let session_id = match req.session_id.as_deref() {
        Some(raw) => match raw.parse::<SessionId>() {
            Ok(id) => id,
            Err(_) => return bad_request("Invalid session ID"),
        },
        None => SessionId::new(),
    };

    let mut state = match handlers.load_or_new(session_id).await {
        Ok(state) => state,
        Err(e) => return handle_store_error(e),
    };

    let outcome = handlers.turn_handler.handle(&mut state, query).await;

    if let Err(e) = handlers.sessions.save(session_id, state).await {
        return handle_store_error(e);
    }

    (
        StatusCode::OK,
        Json(ChatResponse::from_outcome(outcome, session_id)),
    )
        .into_response()
}

/// POST /reset - Forget a session's history
pub async fn reset(
    State(handlers): State<ChatHandlers>,
    body: Result<Json<ResetRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return body_rejected(rejection),
    };
    let session_id = match req.session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid session ID"),
    };

    let mut state = match handlers.load_or_new(session_id).await {
        Ok(state) => state,
        Err(e) => return handle_store_error(e),
    };
    handlers.turn_handler.reset(&mut state);

    if let Err(e) = handlers.sessions.save(session_id, state).await {
        return handle_store_error(e);
    }

    let response = ResetResponse {
        message: "Conversation reset successfully".to_string(),
        session_id: session_id.to_string(),
        status: "success".to_string(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(message)),
    )
        .into_response()
}

fn body_rejected(rejection: JsonRejection) -> Response {
    debug!(reason = %rejection.body_text(), "Rejected request body");
    bad_request("JSON body required")
}

fn handle_store_error(error: SessionStoreError) -> Response {
    error!(error = %error, "Session store failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal(error.to_string())),
    )
        .into_response()
}
