//! Print API
//!
//! | Path | Method | Body |
//! |------|--------|------|
//! | /print | POST | `{label_type?, template?, caption?}` |
//! | /print_custom | POST | `{text}` |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/print", post(handler::print))
        .route("/print_custom", post(handler::print_custom))
}
