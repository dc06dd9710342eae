//! Services module
//!
//! - [`http`] - router assembly and HTTP middleware

pub mod http;
