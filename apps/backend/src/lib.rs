pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;
use crate::services::sessions::SessionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub sessions: Arc<SessionRegistry>,
}

/// Build the API router over `state`
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Learner routes
        .route("/api/learners/me", get(routes::learners::status))
        // Review routes
        .route("/api/review/queue", get(routes::review::queue))
        .route("/api/review/grade", post(routes::review::grade))
        // Session routes
        .route("/api/sessions", post(routes::sessions::start))
        .route(
            "/api/sessions/{id}",
            get(routes::sessions::get).delete(routes::sessions::delete),
        )
        .route("/api/sessions/{id}/grade", post(routes::sessions::grade))
        .route("/api/sessions/{id}/answer", post(routes::sessions::answer))
        .route("/api/sessions/{id}/summary", get(routes::sessions::summary))
        // Settings routes
        .route(
            "/api/settings",
            get(routes::settings::get).put(routes::settings::update),
        )
        // Progress routes
        .route("/api/progress", get(routes::progress::get))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/learners/register", post(routes::learners::register))
        .merge(protected_routes)
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let session_ttl_hours: i64 = match std::env::var("SESSION_TTL_HOURS") {
        Ok(value) => value
            .parse()
            .context("SESSION_TTL_HOURS must be a whole number of hours")?,
        Err(_) => 12,
    };

    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState {
        db: Arc::new(db),
        sessions: Arc::new(SessionRegistry::new(chrono::Duration::hours(
            session_ttl_hours,
        ))),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
