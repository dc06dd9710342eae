//! Unified error handling
//!
//! - [`AppError`] - application error enum, rendered as a JSON error body
//! - [`ErrorBody`] - the wire shape of an error response
//!
//! # Error codes
//!
//! | Code | HTTP | Meaning |
//! |------|------|---------|
//! | E0002 | 400 | Validation failed |
//! | E0003 | 404 | Resource not found |
//! | E9001 | 500 | Internal error |
//! | E9002 | 500 | Counter storage error |
//!
//! # Example
//!
//! ```ignore
//! Err(AppError::not_found("Counter 'Coin'"))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Error response body
///
/// ```json
/// { "code": "E0002", "message": "Text must not be empty" }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Client errors (4xx) ==========
    #[error("Validation failed: {0}")]
    /// Validation failed (400)
    Validation(String),

    #[error("Resource not found: {0}")]
    /// Resource not found (404)
    NotFound(String),

    // ========== System errors (5xx) ==========
    #[error("Storage error: {0}")]
    /// Counter storage error (500)
    Storage(String),

    #[error("Internal server error: {0}")]
    /// Internal error (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            AppError::Storage(msg) => {
                error!(target: "storage", error = %msg, "Storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Storage error")
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(ErrorBody {
            code: code.to_string(),
            message: message.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(e: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
