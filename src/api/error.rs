//! API error types with structured JSON responses.
//!
//! Input-validation failures are rejected immediately with 400s;
//! document parse failures surface a user-actionable message. Source
//! failures never appear here — the checker degrades them to a
//! neutral verdict before the boundary is reached.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::extraction::DocumentError;
use crate::session::SessionError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No PDF file provided")]
    EmptyUpload,
    #[error("File does not look like a valid PDF")]
    InvalidFormat,
    #[error("Missing input: {0}")]
    MissingInput(&'static str),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Document parse failure")]
    ParseFailure(DocumentError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::EmptyUpload => (
                StatusCode::BAD_REQUEST,
                "EMPTY_UPLOAD",
                "No PDF file provided".to_string(),
            ),
            ApiError::InvalidFormat => (
                StatusCode::BAD_REQUEST,
                "INVALID_FORMAT",
                "File does not look like a valid PDF".to_string(),
            ),
            ApiError::MissingInput(field) => (
                StatusCode::BAD_REQUEST,
                "MISSING_INPUT",
                format!("Missing {field}"),
            ),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::ParseFailure(err) => {
                tracing::error!(error = %err, "document parse failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PARSE_FAILURE",
                    err.user_message(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Empty => ApiError::EmptyUpload,
            DocumentError::NotPdf => ApiError::InvalidFormat,
            DocumentError::Parse(_) => ApiError::ParseFailure(err),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
