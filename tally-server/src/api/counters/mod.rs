//! Counter API
//!
//! | Path | Method | Body |
//! |------|--------|------|
//! | /counters | GET | - |
//! | /clear_counters | POST | `{label_type?}` (default `"all"`) |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/counters", get(handler::list))
        .route("/clear_counters", post(handler::clear))
}
