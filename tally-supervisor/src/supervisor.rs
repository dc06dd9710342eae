//! Launches the label service as a child process

use std::path::PathBuf;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::config::SupervisorConfig;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// Starts the configured service and watches it in the background
#[derive(Debug, Clone)]
pub struct Supervisor {
    program: PathBuf,
    args: Vec<String>,
}

impl Supervisor {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &SupervisorConfig) -> Self {
        Self::new(config.service_path.clone(), config.service_args.clone())
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// Spawn the service and return its pid without waiting for it
    ///
    /// A detached task waits for the child and logs how it exited. Must be
    /// called inside a Tokio runtime.
    pub fn launch(&self) -> Result<Option<u32>, LaunchError> {
        let program = self.program.display().to_string();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;

        let pid = child.id();
        info!(%program, ?pid, "Service launched");

        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => info!(%program, %status, "Service exited"),
                Ok(status) => warn!(%program, %status, "Service exited with failure"),
                Err(e) => error!(%program, error = %e, "Failed to wait for service"),
            }
        });

        Ok(pid)
    }
}
