//! Tally Label Server - sequentially numbered product labels
//!
//! # Overview
//!
//! - **Counters** (`counter`): persistent per-category sequence numbers
//! - **Printing** (`printing`): barcode payload, text layout, label
//!   templates and Brother QL dispatch
//! - **HTTP API** (`api`): print, custom print, counter reset
//!
//! # Module layout
//!
//! ```text
//! tally-server/src/
//! ├── core/          # config, state, server
//! ├── counter/       # counter store
//! ├── printing/      # barcode, text, compositor, dispatcher
//! ├── api/           # HTTP routes and handlers
//! ├── services/      # router assembly and middleware
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod counter;
pub mod printing;
pub mod services;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use counter::{CounterError, CounterStore};
pub use printing::{LabelService, PrintDispatcher, PrintOutcome};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// Load `.env`, then initialize logging from the environment
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| anyhow::anyhow!("cannot create log directory {}: {}", dir, e))?;
    }

    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  _______    _ _
 |__   __|  | | |
    | | __ _| | |_   _
    | |/ _` | | | | | |
    | | (_| | | | |_| |
    |_|\__,_|_|_|\__, |
                  __/ |
                 |___/   label server
    "#
    );
}
