//! # Stagehand client
//!
//! Object model for driving a broadcast host process over its call/response
//! bridge.
//!
//! **Purpose:** Model the host's items (placements on a scene) and sources
//! (the shared objects they render), classify sources into typed variants,
//! and issue the host's versioned duplicate and unlink commands.
//!
//! # Architecture
//!
//! - [`bridge::CallBridge`]: the one seam to the host. Everything else is
//!   written against it.
//! - [`host::Host`]: session state (bridge, host version, environment, call
//!   timeout, shared source records).
//! - [`item::Item`] and [`source::Source`]: the identity model. Items
//!   linked to one source share one property record.
//! - [`capabilities`]: chainable accessor traits the types implement.
//! - [`resolver`]: deduplicate items by source and classify the sources.
//! - [`memory_host::MemoryHost`]: an in-memory host for tests and offline
//!   use.

mod binding;
pub mod bridge;
pub mod capabilities;
pub mod error;
pub mod host;
pub mod identity;
pub mod item;
pub mod memory_host;
pub mod properties;
pub mod rectangle;
pub mod resolver;
pub mod scene;
pub mod source;
pub mod url;

pub use bridge::{BridgeCall, CallBridge};
pub use capabilities::{ItemLayout, SourceProperties};
pub use error::{Error, Result};
pub use host::{Environment, Host};
pub use identity::Identity;
pub use item::{DuplicateOptions, Item, ViewKind};
pub use memory_host::MemoryHost;
pub use rectangle::Rectangle;
pub use scene::{Scene, SceneArg};
pub use source::{GameSource, ItemValue, ScreenSource, Source, SourceKind, TypedSource};
pub use stagehand_common::HostVersion;
pub use url::Url;
