//! Logging Infrastructure
//!
//! Structured logging setup with optional JSON lines and daily rolling files.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional file output
///
/// `RUST_LOG` takes precedence over `log_level`. The file appender is only
/// used when `log_dir` exists.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = log_dir
        .map(Path::new)
        .filter(|dir| dir.exists())
        .map(|dir| tracing_appender::rolling::daily(dir, "tally-server"));

    let result = match (file_appender, json.unwrap_or(false)) {
        (Some(writer), true) => builder.json().with_writer(writer).try_init(),
        (Some(writer), false) => builder.with_ansi(false).with_writer(writer).try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }
}
