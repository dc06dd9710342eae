//! API routes
//!
//! - [`index`] - front-end page
//! - [`health`] - health check
//! - [`print`] - label printing
//! - [`counters`] - counter inspection and reset

pub mod counters;
pub mod health;
pub mod index;
pub mod print;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::utils::{AppError, AppResult};

/// Parse an optional JSON body; an empty body yields `T::default()`
pub(crate) fn json_or_default<T: DeserializeOwned + Default>(body: &Bytes) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e)))
}
