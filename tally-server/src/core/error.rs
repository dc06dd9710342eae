use thiserror::Error;

/// Server startup and runtime errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Result type of server lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;
