//! Error types for the dashboard API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashboard_engine::{ComputationFailure, EngineError};
use serde_json::json;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// API error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("View not found: {0}")]
    ViewNotFound(String),

    #[error("{0}")]
    Computation(ComputationFailure),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UnknownView(name) => Error::ViewNotFound(name),
            EngineError::Computation(failure) => Error::Computation(failure),
            EngineError::DataLoad(e) => Error::Internal(e.to_string()),
        }
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::ViewNotFound(_) => StatusCode::NOT_FOUND,
            Error::Computation(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Error::Internal(_) => {
                tracing::error!("Internal error: {:?}", self);
                "Internal server error".to_string()
            }
            Error::Computation(failure) => {
                tracing::warn!(view = %failure.view, reason = %failure.reason, "View failed");
                self.to_string()
            }
            Error::ViewNotFound(_) => self.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}
