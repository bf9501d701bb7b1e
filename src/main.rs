//! MindWell Backend
//!
//! REST backend for a mental-wellness app: survey scoring, journal and mood
//! tracking with SQLite persistence, and a streamed chat relay.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod relay;
mod scoring;
mod store;
mod survey;
mod trends;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{Authenticator, MockAuthenticator, SessionRegistry};
use config::Config;
use db::Repository;
use relay::ChatRelay;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub sessions: Arc<SessionRegistry>,
    pub authenticator: Arc<dyn Authenticator>,
    pub relay: Arc<ChatRelay>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting MindWell Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    let relay = ChatRelay::new(config.llm.clone());
    if !relay.is_configured() {
        tracing::warn!("No completion API key configured (GROQ_API_KEY). Chat will reply with a fallback message!");
    }
    if config.seed_sample_data {
        tracing::info!("Sample data will be seeded for new users");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let state = AppState {
        repo: repo.clone(),
        sessions: Arc::new(SessionRegistry::new()),
        authenticator: Arc::new(MockAuthenticator),
        relay: Arc::new(relay),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repo.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolve on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let sessions = state.sessions.clone();

    // Routes that need an open session
    let session_routes = Router::new()
        // Session
        .route("/auth/logout", post(api::logout))
        .route("/auth/me", get(api::me))
        // Assessments
        .route(
            "/assessments",
            get(api::list_assessments).post(api::submit_assessment),
        )
        .route("/assessments/latest", get(api::latest_assessment))
        .route("/assessments/history", get(api::assessment_history))
        // Journal
        .route(
            "/journal",
            get(api::list_journal).post(api::create_journal_entry),
        )
        .route("/journal/tags", get(api::journal_tags))
        // Mood
        .route("/mood", get(api::list_mood).post(api::log_mood))
        .route("/mood/emotion", post(api::log_emotion))
        .route("/mood/trend", get(api::mood_trend))
        .route("/mood/streak", get(api::mood_streak))
        // Dashboard
        .route("/dashboard", get(api::dashboard))
        .layer(middleware::from_fn(move |req, next| {
            auth::session_auth_layer(sessions.clone(), req, next)
        }));

    // Routes open to anonymous callers
    let public_routes = Router::new()
        .route("/auth/login", post(api::login))
        .route("/auth/register", post(api::register))
        .route("/auth/reset-password", post(api::reset_password))
        .route("/survey", get(api::get_survey))
        .route("/survey/answer", post(api::record_survey_answer))
        .route("/ai-chatbot", post(api::ai_chatbot));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", session_routes.merge(public_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
