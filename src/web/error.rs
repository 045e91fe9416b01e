//! Maps the scheduling core's typed errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::error;

use crate::scheduler::SchedulerError;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    BadRequest,
    CatalogUnavailable,
    Internal,
}

/// A structured error returned to API callers as `{ "code": ..., "message": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    code: ApiErrorCode,
    message: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorCode::BadRequest, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// `CatalogUnavailable` is the only scheduler error that reaches the API
/// boundary as a failure; every other variant is recovered locally by the
/// orchestrator and surfaced as a warning instead.
impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::CatalogUnavailable(ref source) => {
                error!(error = %source, "section catalog unreachable");
                ApiError::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    ApiErrorCode::CatalogUnavailable,
                    "section catalog is unavailable",
                )
            }
            other => {
                error!(error = %other, "unexpected scheduler error");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorCode::Internal, other.to_string())
            }
        }
    }
}
