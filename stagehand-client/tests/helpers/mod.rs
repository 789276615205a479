//! Shared setup for stagehand-client integration tests

#![allow(dead_code)]

use stagehand_client::{Host, HostVersion, MemoryHost};
use std::sync::Arc;

/// First host version with linked sources
pub const LINKED_HOST: &str = "2.9.1608.2701";

/// A host from before linked sources
pub const LEGACY_HOST: &str = "2.8.1605.1801";

/// In-memory host plus a session talking to it
pub fn session(version: &str) -> (Arc<MemoryHost>, Host) {
    let memory = Arc::new(MemoryHost::new());
    let version = HostVersion::parse(version).unwrap();
    let host = Host::new(memory.clone(), version);
    (memory, host)
}

/// Keys of every `get` recorded so far
pub fn get_keys(memory: &MemoryHost) -> Vec<String> {
    memory
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            stagehand_client::BridgeCall::Get { key, .. } => Some(key),
            _ => None,
        })
        .collect()
}
