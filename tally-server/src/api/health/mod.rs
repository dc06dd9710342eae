//! Health check route
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /health | GET | Service, printer and counter file summary |
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "printer": { "address": "tcp://10.0.0.13", "enabled": true },
//!   "counter_file": "counters.json"
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    printer: PrinterInfo,
    counter_file: String,
}

#[derive(Serialize)]
pub struct PrinterInfo {
    address: String,
    enabled: bool,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let dispatcher = state.labels.dispatcher();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        printer: PrinterInfo {
            address: dispatcher.address().to_string(),
            enabled: dispatcher.is_enabled(),
        },
        counter_file: state.labels.counter_store().path().display().to_string(),
    })
}
