//! Control API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /start-service | POST | Launch the label service |
//! | /health | GET | Liveness |

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::error;

use crate::supervisor::Supervisor;

pub fn router(supervisor: Supervisor) -> Router {
    Router::new()
        .route("/start-service", post(start_service))
        .route("/health", get(health))
        .with_state(Arc::new(supervisor))
}

/// POST /start-service - always acknowledges; spawn failures are only logged
async fn start_service(State(supervisor): State<Arc<Supervisor>>) -> Json<Value> {
    if let Err(e) = supervisor.launch() {
        error!(error = %e, "Service launch failed");
    }
    Json(json!({ "status": "Service started" }))
}

async fn health(State(supervisor): State<Arc<Supervisor>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": supervisor.program().display().to_string(),
    }))
}
