//! Error types for the library client

use thiserror::Error;

use crate::models::ErrorBucket;

/// Main client error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Usage error or requested help text, rendered by clap
    #[error(transparent)]
    Usage(#[from] clap::Error),
}

impl AppError {
    /// Convert a local failure into the opaque bucket shape the views display.
    ///
    /// Transport and decode failures are never fatal to the shell; they land
    /// in the same bucket a server-side rejection would.
    pub fn to_bucket(&self) -> ErrorBucket {
        ErrorBucket::from_message(self.to_string())
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
