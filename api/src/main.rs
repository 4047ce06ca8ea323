//! futbol API server
//!
//! Post-match peer evaluation and rating adjustment for amateur football
//! groups. Uses hexagonal (ports & adapters) architecture for clean
//! separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod integration_tests;

use adapters::{
    PostgresEvaluationRepository, PostgresPlayerDirectory, PostgresTraceSink, WebhookNotifier,
};
use app::EvaluationService;
use config::Config;

type Service = EvaluationService<
    PostgresEvaluationRepository,
    PostgresPlayerDirectory,
    WebhookNotifier,
    PostgresTraceSink,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub evaluation_service: Arc<Service>,
    pub evaluations: Arc<PostgresEvaluationRepository>,
    pub directory: Arc<PostgresPlayerDirectory>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,futbol_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting futbol API...");

    // Load configuration
    let config = Config::from_env();

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let evaluations = Arc::new(PostgresEvaluationRepository::new(db.clone()));
    let directory = Arc::new(PostgresPlayerDirectory::new(
        db.clone(),
        config.group_id.clone(),
    ));
    let notifier = Arc::new(WebhookNotifier::new(
        config.webhook_url.clone(),
        config.webhook_secret.clone(),
    ));
    let traces = Arc::new(PostgresTraceSink::new(db.clone()));

    // Create application service
    let evaluation_service = Arc::new(EvaluationService::new(
        evaluations.clone(),
        directory.clone(),
        notifier.clone(),
        traces.clone(),
    ));

    // Create app state
    let state = AppState {
        evaluation_service,
        evaluations,
        directory,
    };

    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    // (SmartIpKeyExtractor requires X-Forwarded-For headers from reverse proxy)
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build governor config")?,
    );

    // Rate-limited routes (rating submission)
    let rate_limited_routes = Router::new()
        .route("/evaluations/:match_id/submit", post(handlers::submit))
        .layer(GovernorLayer {
            config: governor_config,
        });

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(health))
        // Evaluation lifecycle
        .route("/evaluations", post(handlers::initialize))
        .route("/evaluations/cleanup", post(handlers::cleanup))
        .route("/evaluations/:match_id", get(handlers::get_record))
        // Player profiles and per-player queries
        .route("/players/:id", get(handlers::get_profile))
        .route(
            "/players/:id/evaluations/pending",
            get(handlers::pending_evaluations),
        )
        .route(
            "/players/:id/evaluations/completed",
            get(handlers::completed_evaluations),
        )
        // Merge rate-limited routes
        .merge(rate_limited_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
