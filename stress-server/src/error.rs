//! Error handling
//!
//! Every failure on the serving path is answered with 400 and
//! `{"error": "<message>"}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stress_core::CoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed body or invalid feature vector
    #[error("{0}")]
    BadRequest(String),

    /// Artifacts failed to load at startup
    #[error("{0}")]
    ModelUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::BadRequest(msg) => tracing::warn!("Bad request: {}", msg),
            AppError::ModelUnavailable(msg) => tracing::error!("Model unavailable: {}", msg),
        }

        let status = StatusCode::BAD_REQUEST;
        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
