//! Host binding shared by Items and Sources
//!
//! A [`Binding`] is the identity of one object plus the session it talks
//! through. All capability traits reach the host through it, so the
//! get/set-with-rebind logic lives in one place.

use crate::host::Host;
use crate::identity::{read_scene_index, split_item_list, Identity, SourceRecord};
use crate::properties::{attribute_name, is_item_level, PropertyBag};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Access to an object's binding
///
/// Implemented by every Item and Source type; the capability traits are
/// written against it. Not nameable outside the crate.
pub trait Bound: Send + Sync {
    fn binding(&self) -> &Binding;
    fn binding_mut(&mut self) -> &mut Binding;
}

/// Split a host property bag into per-placement and per-source halves
fn split_bag(bag: PropertyBag) -> (PropertyBag, PropertyBag) {
    let mut placement = PropertyBag::new();
    let mut source = PropertyBag::new();
    for (k, v) in bag.iter() {
        if is_item_level(k) {
            placement.insert(k, v);
        } else {
            source.insert(k, v);
        }
    }
    (placement, source)
}

/// The state every Item and Source object is built on
///
/// `direct_call` marks Item objects: they address their own item id and
/// never rebind. Source objects go through [`Binding::source_get`] and
/// [`Binding::source_set`], which confirm the cached item id still renders
/// the source before each call and rebind when it does not.
#[derive(Debug, Clone)]
pub struct Binding {
    host: Host,
    identity: Identity,
    source: Arc<SourceRecord>,
    placement: PropertyBag,
    direct_call: bool,
}

impl Binding {
    pub(crate) fn new(host: Host, identity: Identity, bag: PropertyBag, direct_call: bool) -> Self {
        let (mut placement, source_bag) = split_bag(bag);
        placement.insert("id", identity.item_id.as_str());
        placement.insert("srcid", identity.source_id.as_str());
        let source = host.registry().intern(&identity.source_id, source_bag);
        Self {
            host,
            identity,
            source,
            placement,
            direct_call,
        }
    }

    /// Same source and identity, other call style
    pub(crate) fn with_direct_call(&self, direct_call: bool) -> Self {
        let mut binding = self.clone();
        binding.direct_call = direct_call;
        binding
    }

    pub(crate) fn host(&self) -> &Host {
        &self.host
    }

    pub(crate) fn identity(&self) -> &Identity {
        &self.identity
    }

    pub(crate) fn source(&self) -> &Arc<SourceRecord> {
        &self.source
    }

    pub(crate) fn is_direct_call(&self) -> bool {
        self.direct_call
    }

    /// Point this object at another placement of the same source
    ///
    /// Layout cached for the old placement is dropped when the item id
    /// changes.
    pub(crate) fn rebind(&mut self, item_id: String, scene_index: u32) {
        if item_id != self.identity.item_id || scene_index != self.identity.scene_index {
            debug!(
                "Rebinding {} (scene {}) -> {} (scene {})",
                self.identity.item_id,
                self.identity.scene_number(),
                item_id,
                scene_index + 1
            );
        }
        if item_id != self.identity.item_id {
            self.placement = PropertyBag::new();
            self.placement.insert("srcid", self.identity.source_id.as_str());
        }
        self.placement.insert("id", item_id.as_str());
        self.identity.item_id = item_id;
        self.identity.scene_index = scene_index;
    }

    /// Point this placement at a different source
    ///
    /// The old record's properties seed the new one, since the host copies
    /// them when it splits a source.
    pub(crate) fn relink(&mut self, source_id: String) {
        if source_id == self.identity.source_id {
            return;
        }
        debug!(
            "Item {} moved from source {} to {}",
            self.identity.item_id, self.identity.source_id, source_id
        );
        let seed = self.source.properties();
        self.source = self.host.registry().intern(&source_id, seed);
        self.placement.insert("srcid", source_id.as_str());
        self.identity.source_id = source_id;
    }

    fn cache(&mut self, key: &str, value: &str) {
        if is_item_level(key) {
            self.placement.insert(key, value);
        } else {
            self.source.store(key, value);
        }
    }

    /// Last known value without a round trip
    pub(crate) fn cached(&self, key: &str) -> Option<String> {
        if is_item_level(key) {
            self.placement.get(key).map(str::to_string)
        } else {
            self.source.property(key)
        }
    }

    /// Read `key` addressed to the cached item id
    pub(crate) async fn item_get(&mut self, key: &str) -> Result<String> {
        let value = self.host.get(key, &self.identity.item_id).await?;
        self.cache(key, &value);
        Ok(value)
    }

    /// Write `key` addressed to the cached item id
    pub(crate) async fn item_set(&mut self, key: &str, value: &str) -> Result<()> {
        self.host.set(key, value, &self.identity.item_id).await?;
        self.cache(key, value);
        Ok(())
    }

    /// Read a source property, rebinding first when needed
    pub(crate) async fn source_get(&mut self, key: &str) -> Result<String> {
        self.prepare_source_call(key).await?;
        self.item_get(key).await
    }

    /// Write a source property, rebinding first when needed
    pub(crate) async fn source_set(&mut self, key: &str, value: &str) -> Result<()> {
        self.prepare_source_call(key).await?;
        self.item_set(key, value).await
    }

    async fn prepare_source_call(&mut self, key: &str) -> Result<()> {
        if self.direct_call {
            warn!(
                "Source property {} read through item {} is deprecated, use the item's Source",
                attribute_name(key),
                self.identity.item_id
            );
            return Ok(());
        }
        self.refresh_binding().await
    }

    /// Make sure the cached item id still renders this source
    ///
    /// Hosts without linked sources have one item per source, so nothing
    /// can go stale there.
    pub(crate) async fn refresh_binding(&mut self) -> Result<()> {
        if !self.host.supports_linked_sources() {
            return Ok(());
        }

        let linked = self.linked_item_ids().await?;
        if linked.iter().any(|id| *id == self.identity.item_id) {
            return Ok(());
        }

        let first = linked.into_iter().next().ok_or_else(|| {
            Error::NotFound(format!("no items linked to source {}", self.identity.source_id))
        })?;
        let scene_index = read_scene_index(&self.host, &first).await?;
        self.rebind(first, scene_index);
        Ok(())
    }

    /// Item ids linked to this source, in placement order
    pub(crate) async fn linked_item_ids(&self) -> Result<Vec<String>> {
        let list = self.host.get("itemlist", &self.identity.source_id).await?;
        Ok(split_item_list(&list))
    }

    /// Serialized `<item/>` form of this placement
    pub(crate) fn to_item_xml(&self) -> String {
        let mut bag = self.source.properties();
        bag.merge(&self.placement);
        bag.to_item_xml()
    }
}
