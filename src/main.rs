//! scop3p-assistant - HTTP chat server.
//!
//! Configuration is read from `SCOP3P_ASSISTANT__*` environment variables
//! (see `config::AppConfig`).

use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use scop3p_assistant::adapters::ai::{OllamaConfig, OllamaTextGenerator};
use scop3p_assistant::adapters::database::PostgresSqlExecutor;
use scop3p_assistant::adapters::http::{chat_routes, ChatHandlers};
use scop3p_assistant::adapters::storage::InMemorySessionStore;
use scop3p_assistant::adapters::templates::FileTemplateStore;
use scop3p_assistant::application::HandleQueryHandler;
use scop3p_assistant::config::{AppConfig, ServerConfig};
use scop3p_assistant::domain::foundation::Timestamp;
use scop3p_assistant::ports::TextGenerator;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    config.validate()?;

    // Ports
    let generator = Arc::new(OllamaTextGenerator::new(OllamaConfig::from(&config.ai))?);
    tracing::info!(
        environment = ?config.server.environment,
        model = generator.model_name(),
        prompts_dir = %config.conversation.prompts_dir.display(),
        "Configuration loaded"
    );
    let executor = Arc::new(PostgresSqlExecutor::from_config(&config.database)?);
    let templates = Arc::new(FileTemplateStore::new(&config.conversation.prompts_dir));
    let sessions = Arc::new(InMemorySessionStore::new(
        config.conversation.session_ttl_secs,
        config.conversation.max_sessions,
    ));

    let sweeper = Arc::clone(&sessions);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = sweeper.evict_expired_at(Timestamp::now()).await;
            if evicted > 0 {
                let live = sweeper.len().await;
                tracing::debug!(evicted, live, "Expired sessions evicted");
            }
        }
    });

    let turn_handler = Arc::new(HandleQueryHandler::new(generator, executor, templates));
    let handlers = ChatHandlers::new(turn_handler, sessions, config.conversation.max_history);

    let app = chat_routes(handlers)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "scop3p-assistant listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
