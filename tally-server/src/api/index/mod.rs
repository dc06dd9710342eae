//! Front-end page
//!
//! `GET /` serves the file at `INDEX_PATH` when it exists, otherwise the
//! page compiled into the binary.

use axum::{Router, extract::State, response::Html, routing::get};
use tracing::warn;

use crate::core::ServerState;

const EMBEDDED_INDEX: &str = include_str!("../../../static/index.html");

pub fn router() -> Router<ServerState> {
    Router::new().route("/", get(index))
}

pub async fn index(State(state): State<ServerState>) -> Html<String> {
    let path = &state.config.index_path;
    if path.is_file() {
        match tokio::fs::read_to_string(path).await {
            Ok(page) => return Html(page),
            Err(e) => warn!(path = %path.display(), error = %e, "Cannot read index page, serving embedded page"),
        }
    }
    Html(EMBEDDED_INDEX.to_string())
}
