//! CallBridge: the request/response seam to the host process
//!
//! Every method is one round trip. Implementations own transport concerns
//! (framing, retries, reconnects) and report failures as
//! [`Error::Transport`](crate::Error::Transport).

use crate::Result;
use async_trait::async_trait;

/// One-shot request/response primitive to the host
///
/// Wire values are plain strings and keys are case-sensitive.
#[async_trait]
pub trait CallBridge: Send + Sync {
    /// Read a per-item property (`prop:viewid`, `itemlist`, ...)
    async fn get(&self, key: &str, id: &str) -> Result<String>;

    /// Write a per-item property
    async fn set(&self, key: &str, value: &str, id: &str) -> Result<()>;

    /// Read a process-global host flag (`preview_editor_opened`, ...)
    async fn get_global_property(&self, key: &str) -> Result<String>;

    /// Invoke a named host function (`additem`, `link:1|s:2|additem`, `addurl`)
    async fn call_func(&self, name: &str, argument: &str) -> Result<String>;
}

/// A recorded host round trip
///
/// Used by bridges that log or replay traffic, such as
/// [`MemoryHost`](crate::memory_host::MemoryHost).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    Get { key: String, id: String },
    Set { key: String, value: String, id: String },
    GetGlobal { key: String },
    CallFunc { name: String, argument: String },
}

impl BridgeCall {
    /// Short label used in logs and error messages
    pub fn label(&self) -> String {
        match self {
            BridgeCall::Get { key, .. } => format!("get {}", key),
            BridgeCall::Set { key, .. } => format!("set {}", key),
            BridgeCall::GetGlobal { key } => format!("global {}", key),
            BridgeCall::CallFunc { name, .. } => format!("callFunc {}", name),
        }
    }

    /// Function name for `CallFunc`, `None` otherwise
    pub fn func_name(&self) -> Option<&str> {
        match self {
            BridgeCall::CallFunc { name, .. } => Some(name),
            _ => None,
        }
    }
}
