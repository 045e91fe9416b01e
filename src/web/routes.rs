//! Web API router construction.

use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::middleware::security_headers::SecurityHeadersLayer;
use crate::web::{schedule, status};

/// Creates the web server router: the scheduling endpoint plus health/status.
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/status", get(status::status))
        .route("/schedule", post(schedule::schedule))
        .with_state(app_state.clone());

    let router = Router::new()
        .route("/health", get(status::health))
        .with_state(app_state)
        .nest("/api", api_router);

    router.layer((
        // Outermost: per-request ID span + severity-proportional response logging.
        RequestIdLayer,
        // Security headers on every response (HSTS only when behind a TLS proxy).
        SecurityHeadersLayer,
        CompressionLayer::new()
            .zstd(true)
            .br(true)
            .gzip(true)
            .quality(tower_http::CompressionLevel::Fastest),
        TimeoutLayer::new(Duration::from_secs(60)),
    ))
}
