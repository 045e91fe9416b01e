//! Health and status handlers.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use serde_json::{Value, json};
use ts_rs::TS;
use tracing::trace;

use crate::state::AppState;
use crate::web::error::ApiError;

#[derive(Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: String,
    pub commit: String,
}

/// `GET /health`: liveness probe. Pings the catalog database so an
/// unreachable backing store is visible to orchestration tooling before a
/// scheduling request ever hits it.
pub(super) async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    trace!("health check requested");
    crate::data::health::ping(&state.db_pool)
        .await
        .map_err(crate::scheduler::SchedulerError::CatalogUnavailable)?;
    Ok(Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// `GET /api/status`: version and build metadata, independent of catalog
/// reachability (use `/health` for that).
pub(super) async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running",
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: env!("GIT_COMMIT_HASH").to_string(),
    })
}
