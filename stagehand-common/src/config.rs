//! Configuration loading
//!
//! Config file resolution priority:
//! 1. Explicit path argument (highest priority)
//! 2. `STAGEHAND_CONFIG` environment variable
//! 3. Platform config directory (`<config dir>/stagehand/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing file never stops the client: a warning is logged and defaults
//! are used. A file that exists but does not parse is an error.

use crate::version::HostVersion;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "STAGEHAND_CONFIG";

/// Top-level client configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Host session settings
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    /// Negotiated host application version (optional)
    #[serde(default)]
    pub version: Option<HostVersion>,

    /// Context the client runs in
    #[serde(default)]
    pub environment: EnvironmentKind,

    /// Upper bound for one host round trip, 0 disables the bound
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            version: None,
            environment: EnvironmentKind::default(),
            call_timeout_ms: default_call_timeout_ms(),
        }
    }
}

impl HostConfig {
    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_ms > 0).then(|| Duration::from_millis(self.call_timeout_ms))
    }
}

/// Where the client code is hosted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentKind {
    /// Extension window
    #[default]
    Extension,
    /// Page rendered as a source on the stage
    SourcePlugin,
    /// Properties window of a source plugin
    SourceProps,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_call_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve and load configuration following the priority order
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_path) {
            Some(path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                Self::from_file(&path)
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => {
                warn!("No config file location available, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Config file location following the priority order
///
/// Returns `None` only when no explicit path or environment variable is set
/// and the platform has no config directory.
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    dirs::config_dir().map(|d| d.join("stagehand").join("config.toml"))
}
