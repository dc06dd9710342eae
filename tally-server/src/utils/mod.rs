//! Utility module
//!
//! - [`AppError`] - application error type
//! - [`AppResult`] - handler result alias
//! - logging setup

pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, ErrorBody};
pub use result::AppResult;
