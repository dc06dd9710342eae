//! Print API Handlers

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::api::json_or_default;
use crate::core::ServerState;
use crate::printing::PrintRequest;
use crate::printing::service::{CustomReceipt, PrintReceipt};
use crate::utils::AppResult;

#[derive(Debug, Default, Deserialize)]
pub struct PrintBody {
    pub label_type: Option<String>,
    pub template: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PrintCustomBody {
    pub text: String,
}

/// POST /print - print the next label of a category
pub async fn print(State(state): State<ServerState>, body: Bytes) -> AppResult<Json<PrintReceipt>> {
    let body: PrintBody = json_or_default(&body)?;
    tracing::debug!(?body, "Print request");

    let receipt = state
        .labels
        .print(PrintRequest {
            label_type: body.label_type,
            template: body.template,
            caption: body.caption,
        })
        .await?;
    Ok(Json(receipt))
}

/// POST /print_custom - print a free-text label
pub async fn print_custom(
    State(state): State<ServerState>,
    payload: Result<Json<PrintCustomBody>, JsonRejection>,
) -> AppResult<Json<CustomReceipt>> {
    let Json(body) = payload?;
    let receipt = state.labels.print_custom(&body.text).await?;
    Ok(Json(receipt))
}
