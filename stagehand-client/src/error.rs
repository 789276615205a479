//! Error types for stagehand-client
//!
//! Host round-trip failures are produced by the [`CallBridge`] implementation
//! and travel to the caller untouched; the object model never retries or
//! rewraps them.
//!
//! [`CallBridge`]: crate::bridge::CallBridge

use std::time::Duration;
use thiserror::Error;

/// Main error type for the client object model
#[derive(Error, Debug)]
pub enum Error {
    /// Caller passed arguments the operation cannot use
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A host round trip was rejected
    #[error("Transport failure in {call}: {message}")]
    Transport { call: String, message: String },

    /// A host round trip did not settle within the configured bound
    #[error("Host call {call} timed out after {after:?}")]
    Timeout { call: String, after: Duration },

    /// Host reported no such item or source
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation is not valid for this object in its current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Host answered with a value the client cannot interpret
    #[error("Unexpected host response for {key}: {value:?}")]
    UnexpectedResponse { key: String, value: String },

    /// Item XML could not be parsed
    #[error("XML error: {0}")]
    Xml(String),

    /// Shared configuration, version or message errors
    #[error(transparent)]
    Common(#[from] stagehand_common::Error),
}

impl Error {
    /// Build a transport error for `call`
    pub fn transport(call: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Transport {
            call: call.into(),
            message: message.into(),
        }
    }
}

/// Convenience Result type using the client Error
pub type Result<T> = std::result::Result<T, Error>;
