//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its
//! translation into HTTP responses.

use crate::config::ConfigError;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use project_workspace_core::ports::PortError;
use serde::Serialize;
use tracing::{error, warn};

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// The request body was not the JSON shape the endpoint declares.
    #[error("Invalid JSON body: {0}")]
    Json(#[from] JsonRejection),

    /// A path segment (such as a project id) failed to parse.
    #[error("Invalid path: {0}")]
    Path(#[from] PathRejection),

    /// The request was not a multipart form at all.
    #[error("Invalid upload request: {0}")]
    MultipartForm(#[from] MultipartRejection),

    /// The multipart upload stream was malformed or too large.
    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    /// Request input that parsed but is missing something the endpoint needs.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Machine-readable code plus a human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Port(PortError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "not_found", msg.clone())
            }
            ApiError::Port(PortError::Validation(msg)) | ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            ApiError::Json(rejection) => {
                (rejection.status(), "validation_error", rejection.body_text())
            }
            ApiError::Path(rejection) => {
                (rejection.status(), "validation_error", rejection.body_text())
            }
            ApiError::MultipartForm(rejection) => {
                (rejection.status(), "validation_error", rejection.body_text())
            }
            ApiError::Multipart(e) => (e.status(), "validation_error", e.body_text()),
            ApiError::Port(PortError::Storage(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Failed to store the uploaded file".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}
