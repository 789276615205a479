//! # Stagehand Common Library
//!
//! Shared code for the stagehand client crates:
//! - Error types
//! - Configuration loading
//! - Logging setup
//! - Host version comparison
//! - The configuration event bridge (ConfigBridge)

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod version;

pub use error::{Error, Result};
pub use events::{ConfigBridge, ConfigEvent};
pub use version::HostVersion;
