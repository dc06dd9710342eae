//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Printer model not in the supported table
    #[error("Unsupported printer model: {0}")]
    UnsupportedModel(String),

    /// Label roll not in the supported table
    #[error("Unsupported label size: {0}")]
    UnsupportedLabel(String),

    /// Printer answered with an error status
    #[error("Printer rejected job: {0}")]
    Rejected(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
