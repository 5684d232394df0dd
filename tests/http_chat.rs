//! Integration tests for the chat HTTP endpoints.
//!
//! These tests drive the axum router with `tower::ServiceExt::oneshot`:
//! 1. Request validation maps to 400 responses
//! 2. Turns are stored per session between requests
//! 3. Reset and health endpoints respond correctly

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use scop3p_assistant::adapters::ai::MockTextGenerator;
use scop3p_assistant::adapters::database::MockSqlExecutor;
use scop3p_assistant::adapters::http::chat::SERVICE_NAME;
use scop3p_assistant::adapters::http::{chat_routes, ChatHandlers};
use scop3p_assistant::adapters::storage::InMemorySessionStore;
use scop3p_assistant::adapters::templates::InMemoryTemplateStore;
use scop3p_assistant::application::HandleQueryHandler;
use scop3p_assistant::domain::conversation::GREETING_REPLY;
use scop3p_assistant::domain::foundation::SessionId;
use scop3p_assistant::ports::SessionStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(sessions: Arc<InMemorySessionStore>) -> Router {
    let turn_handler = Arc::new(HandleQueryHandler::new(
        Arc::new(MockTextGenerator::failing()),
        Arc::new(MockSqlExecutor::new()),
        Arc::new(InMemoryTemplateStore::new()),
    ));
    chat_routes(ChatHandlers::new(turn_handler, sessions, 4))
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// POST /chat
// =============================================================================

#[tokio::test]
async fn chat_rejects_empty_query() {
    let sessions = Arc::new(InMemorySessionStore::default());

    let (status, body) = send(app(sessions.clone()), post("/chat", json!({"query": "   "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["status"], "error");
    assert_eq!(sessions.len().await, 0);
}

#[tokio::test]
async fn chat_rejects_malformed_session_id() {
    let sessions = Arc::new(InMemorySessionStore::default());

    let (status, body) = send(
        app(sessions),
        post("/chat", json!({"query": "hi", "session_id": "not-a-uuid"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid session ID");
}

#[tokio::test]
async fn chat_rejects_unreadable_bodies_as_json_errors() {
    let requests = [
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from("{\"query\": "))
            .unwrap(),
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "text/plain")
            .body(Body::from("What is a phosphosite?"))
            .unwrap(),
        Request::builder()
            .method("POST")
            .uri("/chat")
            .body(Body::empty())
            .unwrap(),
    ];

    for request in requests {
        let sessions = Arc::new(InMemorySessionStore::default());
        let (status, body) = send(app(sessions.clone()), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "JSON body required");
        assert_eq!(sessions.len().await, 0);
    }
}

#[tokio::test]
async fn reset_without_body_is_a_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/reset")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(Arc::new(InMemorySessionStore::default())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "JSON body required");
}

#[tokio::test]
async fn chat_creates_session_and_answers() {
    let sessions = Arc::new(InMemorySessionStore::default());

    let (status, body) = send(app(sessions.clone()), post("/chat", json!({"query": "Hi"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], GREETING_REPLY);
    assert_eq!(body["action"], "DIRECT_RESPONSE");
    assert_eq!(body["status"], "success");

    let session_id: SessionId = body["session_id"].as_str().unwrap().parse().unwrap();
    let state = sessions.load(session_id).await.unwrap();
    assert_eq!(state.len(), 1);
    assert_eq!(state.last_query(), Some("Hi"));
}

#[tokio::test]
async fn chat_continues_existing_session() {
    let sessions = Arc::new(InMemorySessionStore::default());
    let (_, first) = send(app(sessions.clone()), post("/chat", json!({"query": "Hi"}))).await;
    let session_id = first["session_id"].as_str().unwrap().to_string();

    let (status, second) = send(
        app(sessions.clone()),
        post("/chat", json!({"query": "thanks", "session_id": session_id})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["session_id"], first["session_id"]);
    let state = sessions
        .load(session_id.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(state.len(), 2);
    assert_eq!(sessions.len().await, 1);
}

// =============================================================================
// POST /reset and GET /health
// =============================================================================

#[tokio::test]
async fn reset_clears_session_history() {
    let sessions = Arc::new(InMemorySessionStore::default());
    let (_, first) = send(app(sessions.clone()), post("/chat", json!({"query": "Hi"}))).await;
    let session_id = first["session_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app(sessions.clone()),
        post("/reset", json!({"session_id": session_id})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Conversation reset successfully");
    let state = sessions
        .load(session_id.parse().unwrap())
        .await
        .unwrap();
    assert!(state.is_empty());
    assert_eq!(state.capacity(), 4);
}

#[tokio::test]
async fn health_reports_service() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(Arc::new(InMemorySessionStore::default())), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], SERVICE_NAME);
}
