//! Counter API Handlers

use axum::{Json, body::Bytes, extract::State};
use serde::Deserialize;

use crate::api::json_or_default;
use crate::core::ServerState;
use crate::counter::Counters;
use crate::printing::service::ClearReceipt;
use crate::utils::AppResult;

#[derive(Debug, Default, Deserialize)]
pub struct ClearBody {
    pub label_type: Option<String>,
}

/// GET /counters - current counter values
pub async fn list(State(state): State<ServerState>) -> Json<Counters> {
    Json(state.labels.snapshot())
}

/// POST /clear_counters - reset one category or all of them
pub async fn clear(State(state): State<ServerState>, body: Bytes) -> AppResult<Json<ClearReceipt>> {
    let body: ClearBody = json_or_default(&body)?;
    let receipt = state.labels.clear(body.label_type.as_deref())?;
    Ok(Json(receipt))
}
