//! Common error types for stagehand

use thiserror::Error;

/// Common result type for stagehand operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the stagehand crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Host version string could not be parsed
    #[error("Invalid host version: {0}")]
    InvalidVersion(String),

    /// Inbound host message could not be decoded
    #[error("Malformed message: {0}")]
    MalformedMessage(String),
}
