use std::path::PathBuf;

/// Supervisor configuration
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | SUPERVISOR_PORT | 5001 | Control API port |
/// | SERVICE_PATH | tally-server | Executable to launch |
/// | SERVICE_ARGS | (empty) | Whitespace-separated arguments |
/// | LOG_LEVEL | info | Log filter |
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub port: u16,
    pub service_path: PathBuf,
    pub service_args: Vec<String>,
    pub log_level: String,
}

impl SupervisorConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("SUPERVISOR_PORT")
                .ok()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(5001),
            service_path: PathBuf::from(
                std::env::var("SERVICE_PATH").unwrap_or_else(|_| "tally-server".into()),
            ),
            service_args: std::env::var("SERVICE_ARGS")
                .map(|args| args.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }
}
