//! Application error type shared by the core, the storage backends and the HTTP layer.
//!
//! Every storage backend maps its internal failures into [`AppError`], and the
//! [`Coder`](crate::application::services::Coder) passes them through unchanged.
//! The HTTP layer relies on [`IntoResponse`] to turn each variant into a status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description rendered in JSON error responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
}

/// Errors produced by URI encoding, decoding and storage operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    /// The submitted string is not a valid absolute URI. Never retried.
    #[error("incorrect URI: {0}")]
    InvalidUri(String),

    /// No short link exists for the code.
    #[error("short link not found: {code}")]
    NotFound { code: String },

    /// The short link exists but has been soft-deleted.
    #[error("short link has been deleted: {code}")]
    RowDeleted { code: String },

    /// The URI was already shortened. Carries the pre-existing code, so this is
    /// a success signal rather than a failure for idempotent encoding.
    #[error("URI is already shortened as {code}")]
    Conflict { code: String },

    /// The backend could not be reached or failed the operation.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The caller has no user identity but the operation requires one.
    #[error("user is not authenticated")]
    Unauthorized,
}

impl AppError {
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn row_deleted(code: impl Into<String>) -> Self {
        Self::RowDeleted { code: code.into() }
    }

    pub fn conflict(code: impl Into<String>) -> Self {
        Self::Conflict { code: code.into() }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable(message.into())
    }

    /// Returns the already existing code when this error is an idempotent-encoding conflict.
    pub fn existing_code(&self) -> Option<&str> {
        match self {
            Self::Conflict { code } => Some(code),
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUri(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::RowDeleted { .. } => StatusCode::GONE,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUri(_) => "invalid_uri",
            Self::NotFound { .. } => "not_found",
            Self::RowDeleted { .. } => "row_deleted",
            Self::Conflict { .. } => "conflict",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Unauthorized => "unauthorized",
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.kind(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "database error");
        Self::StorageUnavailable(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self::StorageUnavailable(format!("I/O error: {e}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::StorageUnavailable(format!("serialization error: {e}"))
    }
}
