//! # tally-supervisor
//!
//! Small control service that starts `tally-server` on request. The label
//! server does not depend on it; it can be started directly as well.

pub mod config;
pub mod http;
pub mod supervisor;

pub use config::SupervisorConfig;
pub use supervisor::{LaunchError, Supervisor};
