use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Start-up and serving failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AppError> for ServerError {
    fn from(err: AppError) -> Self {
        match err.code {
            ErrorCode::ConfigError => ServerError::Config(err.message),
            _ => ServerError::Database(err.message),
        }
    }
}

/// Result alias for server start-up
pub type Result<T> = std::result::Result<T, ServerError>;
