//! Storybook — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storybook_core::error::DomainError;
use storybook_pdf::PdfError;
use thiserror::Error;
use tracing::error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Tracing or span exporter setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// Validation, upstream, or infrastructure failure.
    Domain(DomainError),
    /// The PDF could not be produced.
    Render(PdfError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<PdfError> for ApiError {
    fn from(err: PdfError) -> Self {
        Self::Render(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            Self::Domain(err @ DomainError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "validation_error", err.to_string())
            }
            Self::Domain(err @ DomainError::Upstream(_)) => {
                (StatusCode::BAD_GATEWAY, "upstream_error", err.to_string())
            }
            Self::Domain(err @ DomainError::Infrastructure(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "infrastructure_error",
                err.to_string(),
            ),
            Self::Render(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "render_error",
                err.to_string(),
            ),
        };

        if status.is_server_error() {
            error!(status = %status, error = %message, "request failed");
        }

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}
