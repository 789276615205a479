//! Configuration event bridge
//!
//! Normalizes the two inbound host message shapes into two semantic events,
//! `save-config` and `apply-config`, consumed by embedded configuration UIs.

mod envelope;

pub use envelope::{EnvelopeRequest, MessageEnvelope, REQUEST_APPLY_CONFIG, REQUEST_SAVE_CONFIG};

use crate::{Error, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

static GLOBAL_BRIDGE: OnceCell<ConfigBridge> = OnceCell::new();

/// Receiving end of one subscription
pub type ConfigReceiver = mpsc::UnboundedReceiver<ConfigEvent>;

/// Configuration events
///
/// Payloads are opaque JSON owned by the plugin; the bridge never inspects
/// them beyond checking they parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConfigEvent {
    /// The plugin should persist this configuration
    SaveConfig {
        data: Value,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The plugin should apply the changes this configuration describes
    ApplyConfig {
        data: Value,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl ConfigEvent {
    pub fn save(data: Value) -> Self {
        ConfigEvent::SaveConfig {
            data,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn apply(data: Value) -> Self {
        ConfigEvent::ApplyConfig {
            data,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Event name as seen by configuration UIs
    pub fn event_type(&self) -> &'static str {
        match self {
            ConfigEvent::SaveConfig { .. } => "save-config",
            ConfigEvent::ApplyConfig { .. } => "apply-config",
        }
    }

    pub fn data(&self) -> &Value {
        match self {
            ConfigEvent::SaveConfig { data, .. } | ConfigEvent::ApplyConfig { data, .. } => data,
        }
    }
}

/// Publish/subscribe bus for configuration events
///
/// Every subscriber owns an unbounded queue:
/// - Publishing never blocks on slow subscribers and never drops events for
///   them; a subscriber that falls behind catches up later
/// - Subscribing and dropping receivers is safe at any time; closed queues
///   are pruned on the next dispatch
/// - All events of one inbound message are queued to every current
///   subscriber before `deliver_*` returns, so inbound order is preserved
///
/// Most callers use [`ConfigBridge::global`]; separate instances are useful
/// in tests.
///
/// # Examples
///
/// ```
/// use stagehand_common::events::ConfigBridge;
///
/// let bridge = ConfigBridge::new();
/// let mut rx = bridge.subscribe();
///
/// bridge.deliver_raw_config(r#"{"volume": 3}"#);
///
/// let first = rx.try_recv().unwrap();
/// let second = rx.try_recv().unwrap();
/// assert_eq!(first.event_type(), "apply-config");
/// assert_eq!(second.event_type(), "save-config");
/// ```
#[derive(Default)]
pub struct ConfigBridge {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ConfigEvent>>>,
}

impl ConfigBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide bridge, created on first access and never torn down
    pub fn global() -> &'static ConfigBridge {
        GLOBAL_BRIDGE.get_or_init(ConfigBridge::new)
    }

    /// Subscribe to all future configuration events
    pub fn subscribe(&self) -> ConfigReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }

    /// Entry point for generic host messages
    ///
    /// `saveConfig` emits `save-config`, `applyConfig` emits `apply-config`.
    /// Anything else parses but emits nothing. Returns the number of events
    /// emitted.
    ///
    /// Unparseable text is reported as [`Error::MalformedMessage`].
    pub fn deliver_envelope(&self, message: &str) -> Result<usize> {
        let envelope: MessageEnvelope = serde_json::from_str(message)
            .map_err(|e| Error::MalformedMessage(e.to_string()))?;

        let event = match envelope.request() {
            Some(EnvelopeRequest::SaveConfig) => ConfigEvent::save(envelope.data),
            Some(EnvelopeRequest::ApplyConfig) => ConfigEvent::apply(envelope.data),
            None => {
                debug!("Ignoring host message with request {:?}", envelope.request);
                return Ok(0);
            }
        };

        self.dispatch(&[event]);
        Ok(1)
    }

    /// Entry point for raw configuration objects
    ///
    /// Emits `apply-config` then `save-config` with the same payload and
    /// returns the number of events emitted. Input that is not a JSON object
    /// is dropped: nothing is emitted and no error reaches the caller.
    pub fn deliver_raw_config(&self, config: &str) -> usize {
        let data = match serde_json::from_str::<Value>(config) {
            Ok(value @ Value::Object(_)) => value,
            Ok(other) => {
                warn!("Dropping configuration that is not an object: {}", other);
                return 0;
            }
            Err(e) => {
                warn!("Dropping malformed configuration: {}", e);
                return 0;
            }
        };

        self.dispatch(&[ConfigEvent::apply(data.clone()), ConfigEvent::save(data)]);
        2
    }

    /// Queue the events of one message to every open subscriber
    ///
    /// The subscriber list stays locked for the whole message, so a
    /// concurrent delivery or subscription lands before or after it, never
    /// in between.
    fn dispatch(&self, events: &[ConfigEvent]) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| {
            let open = events.iter().all(|event| tx.send(event.clone()).is_ok());
            if !open {
                debug!("Dropping closed configuration subscriber");
            }
            open
        });
    }

    /// Number of subscribers whose receiver is still alive
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}
