//! Duplicating and unlinking items
//!
//! Both operations are commands: the host never reports the identity of a
//! created item back, so neither returns one.

use super::Item;
use crate::scene::{Scene, SceneArg};
use crate::{Error, Result};
use stagehand_common::HostVersion;
use tracing::info;

/// Options for [`Item::duplicate`]
///
/// `scene` must be a [`Scene`]; a bare number is rejected with
/// `InvalidParameters` on hosts that support linked sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicateOptions {
    pub linked: Option<bool>,
    pub scene: Option<SceneArg>,
}

impl DuplicateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn linked(mut self, linked: bool) -> Self {
        self.linked = Some(linked);
        self
    }

    pub fn scene(mut self, scene: impl Into<SceneArg>) -> Self {
        self.scene = Some(scene.into());
        self
    }
}

/// The host call a duplicate turns into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCall {
    pub name: String,
    /// Set `prop:keeploaded` on the item first
    pub keep_loaded: bool,
}

/// Work out the call for a duplicate of an item placed in `current_scene`
///
/// Hosts older than linked sources only know `additem` and every option is
/// ignored there, even invalid ones. Newer hosts get `link:{0|1}`, then
/// `s:{scene}` unless no option was given at all, then `additem`. An explicit
/// scene goes out as its number; without one the item's own internal scene
/// id is sent as is.
pub fn plan_duplicate(
    version: &HostVersion,
    options: Option<&DuplicateOptions>,
    current_scene: Scene,
) -> Result<DuplicateCall> {
    if !version.supports_linked_sources() {
        return Ok(DuplicateCall {
            name: "additem".to_string(),
            keep_loaded: false,
        });
    }

    let scene = match options.and_then(|o| o.scene.as_ref()) {
        Some(arg) => Some(arg.as_scene().ok_or_else(|| {
            Error::InvalidParameters(format!("scene must be a Scene, got {:?}", arg))
        })?),
        None => None,
    };

    let linked = options.and_then(|o| o.linked);
    let link = if linked == Some(true) { 1 } else { 0 };

    let name = match (scene, linked) {
        (None, None) => format!("link:{}|additem", link),
        (Some(scene), _) => format!("link:{}|s:{}|additem", link, scene.number()),
        (None, Some(_)) => format!("link:{}|s:{}|additem", link, current_scene.index()),
    };

    Ok(DuplicateCall {
        name,
        keep_loaded: link == 1,
    })
}

impl Item {
    /// Place a copy of this item
    ///
    /// With `linked`, the copy shares this item's source and the source is
    /// kept loaded. Resolves with this same item.
    pub async fn duplicate(&mut self, options: Option<DuplicateOptions>) -> Result<&mut Self> {
        let call = plan_duplicate(
            self.binding.host().version(),
            options.as_ref(),
            self.scene(),
        )?;

        if call.keep_loaded {
            self.binding.item_set("prop:keeploaded", "1").await?;
        }

        let xml = self.to_xml();
        self.binding.host().call_func(&call.name, &xml).await?;
        info!("Duplicated item {} with {}", self.id(), call.name);
        Ok(self)
    }

    /// Detach this item from the shared source
    ///
    /// There is no way back: once unlinked, an item is never linked again
    /// by this client. Unlinking an unlinked item succeeds and changes
    /// nothing. On hosts with linked sources the item then renders a source
    /// of its own, whose id is read back.
    pub async fn unlink(&mut self) -> Result<&mut Self> {
        self.binding.item_set("prop:globalsrc", "0").await?;

        if self.binding.host().supports_linked_sources() {
            let source_id = self.binding.item_get("prop:srcid").await?;
            let source_id = source_id.trim();
            if !source_id.is_empty() {
                self.binding.relink(source_id.to_string());
            }
        }

        info!("Unlinked item {}", self.id());
        Ok(self)
    }
}
