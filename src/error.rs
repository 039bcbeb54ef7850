// Error types for wgsentry

use thiserror::Error;

/// Result type alias using anyhow::Error
pub type Result<T> = anyhow::Result<T>;

/// Wgsentry-specific error types
#[derive(Error, Debug)]
pub enum SentryError {
    #[error("Health probe could not run: {0}")]
    Probe(String),

    #[error("Failed to control container '{target}': {message}")]
    ContainerControl { target: String, message: String },

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
