//! Inbound host message shapes

use serde::Deserialize;
use serde_json::Value;

/// `request` discriminator asking the plugin to persist its configuration
pub const REQUEST_SAVE_CONFIG: &str = "saveConfig";

/// `request` discriminator asking the plugin to apply a configuration
pub const REQUEST_APPLY_CONFIG: &str = "applyConfig";

/// Generic message envelope delivered by the host
///
/// ```json
/// { "request": "saveConfig", "data": { "x": 1 } }
/// ```
///
/// Envelopes without a `request` field, or with a request this bridge does
/// not know, are valid but carry nothing to dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEnvelope {
    #[serde(default)]
    pub request: Option<String>,

    #[serde(default)]
    pub data: Value,
}

/// What an envelope asks the bridge to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeRequest {
    SaveConfig,
    ApplyConfig,
}

impl MessageEnvelope {
    pub fn request(&self) -> Option<EnvelopeRequest> {
        match self.request.as_deref() {
            Some(REQUEST_SAVE_CONFIG) => Some(EnvelopeRequest::SaveConfig),
            Some(REQUEST_APPLY_CONFIG) => Some(EnvelopeRequest::ApplyConfig),
            _ => None,
        }
    }
}
