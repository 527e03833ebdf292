//! Handler error type

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors returned by handlers as `{"error": message}` JSON
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Conflict(String),
    DatabaseError(String),
}

impl From<ca_common::Error> for ApiError {
    fn from(err: ca_common::Error) -> Self {
        ApiError::DatabaseError(err.to_string())
    }
}

/// Ids in routes are integers; anything else names no resource
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::NotFound(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", msg))
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
