//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every failure renders as:
//!
//! ```json
//! { "error": { "code": "NULLIFIER_REUSE", "message": "..." } }
//! ```
//!
//! Protocol rejections keep their own code. They answer 422, except
//! replays of consumed state (`NULLIFIER_REUSE`, `DUPLICATE_COMMITMENT`)
//! which answer 409.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pop_core::{ProtocolError, ValidationError};
use pop_crypto::CryptoError;
use pop_sbt::SbtError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The protocol rejected the submission (422 or 409).
    #[error("{0}")]
    Rejected(#[from] ProtocolError),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Rejected(err) => {
                let status = match err {
                    ProtocolError::NullifierReuse { .. } | ProtocolError::DuplicateCommitment(_) => StatusCode::CONFLICT,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, err.code())
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<SbtError> for AppError {
    fn from(err: SbtError) -> Self {
        match err {
            SbtError::TokenNotFound(_) => Self::NotFound(err.to_string()),
            SbtError::Encoding(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::IndexOutOfRange { .. } | CryptoError::LeafNotFound(_) => Self::NotFound(err.to_string()),
            CryptoError::Poseidon(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.to_string())
    }
}
