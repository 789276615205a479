//! Host session
//!
//! A [`Host`] bundles everything an object needs to talk to the host
//! process: the [`CallBridge`], the negotiated version, the hosting
//! environment, the per-call time bound and the registry of shared source
//! records. It is cheap to clone; every Item and Source holds one.

use crate::bridge::CallBridge;
use crate::identity::SourceRegistry;
use crate::{Error, Result};
use stagehand_common::config::{ClientConfig, EnvironmentKind};
use stagehand_common::HostVersion;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub use stagehand_common::config::EnvironmentKind as Environment;

#[derive(Clone)]
pub struct Host {
    bridge: Arc<dyn CallBridge>,
    version: HostVersion,
    environment: EnvironmentKind,
    call_timeout: Option<Duration>,
    registry: Arc<SourceRegistry>,
}

impl Host {
    /// Session for an extension with no call time bound
    pub fn new(bridge: Arc<dyn CallBridge>, version: HostVersion) -> Self {
        Self {
            bridge,
            version,
            environment: EnvironmentKind::Extension,
            call_timeout: None,
            registry: Arc::new(SourceRegistry::new()),
        }
    }

    /// Session configured from `[host]`
    ///
    /// Fails with a configuration error when no host version is configured.
    pub fn from_config(bridge: Arc<dyn CallBridge>, config: &ClientConfig) -> Result<Self> {
        let version = config.host.version.clone().ok_or_else(|| {
            stagehand_common::Error::Config("host.version is not configured".to_string())
        })?;

        Ok(Self::new(bridge, version)
            .with_environment(config.host.environment)
            .with_call_timeout(config.host.call_timeout()))
    }

    pub fn with_environment(mut self, environment: EnvironmentKind) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn version(&self) -> &HostVersion {
        &self.version
    }

    pub fn environment(&self) -> EnvironmentKind {
        self.environment
    }

    pub fn is_source_plugin(&self) -> bool {
        self.environment == EnvironmentKind::SourcePlugin
    }

    /// `true` when the host understands linked sources
    pub fn supports_linked_sources(&self) -> bool {
        self.version.supports_linked_sources()
    }

    pub(crate) fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub async fn get(&self, key: &str, id: &str) -> Result<String> {
        debug!("get {} [{}]", key, id);
        self.bounded(format!("get {}", key), self.bridge.get(key, id))
            .await
    }

    pub async fn set(&self, key: &str, value: &str, id: &str) -> Result<()> {
        debug!("set {}={:?} [{}]", key, value, id);
        self.bounded(format!("set {}", key), self.bridge.set(key, value, id))
            .await
    }

    pub async fn get_global_property(&self, key: &str) -> Result<String> {
        debug!("global {}", key);
        self.bounded(
            format!("global {}", key),
            self.bridge.get_global_property(key),
        )
        .await
    }

    pub async fn call_func(&self, name: &str, argument: &str) -> Result<String> {
        debug!("callFunc {}", name);
        self.bounded(
            format!("callFunc {}", name),
            self.bridge.call_func(name, argument),
        )
        .await
    }

    async fn bounded<T>(&self, call: String, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match self.call_timeout {
            Some(after) => tokio::time::timeout(after, fut)
                .await
                .map_err(|_| Error::Timeout { call, after })?,
            None => fut.await,
        }
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("version", &self.version)
            .field("environment", &self.environment)
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}
