//! Items: placements of a source on a scene
//!
//! An [`Item`] owns its layout state and shares its source state with every
//! other item linked to the same source. Items address their own item id
//! directly; reading source properties through an item still works but is
//! deprecated in favor of [`Item::source`].

pub mod linkage;
pub mod view;

pub use linkage::{plan_duplicate, DuplicateCall, DuplicateOptions};
pub use view::{resolve_view, ViewKind, EDITOR_VIEW_ID, PREVIEW_EDITOR_FLAG};

use crate::binding::{Binding, Bound};
use crate::capabilities::{ItemLayout, SourceProperties};
use crate::host::Host;
use crate::identity::{resolve_identity, Identity};
use crate::properties::PropertyBag;
use crate::resolver;
use crate::scene::Scene;
use crate::source::TypedSource;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Item {
    binding: Binding,
}

impl Item {
    pub(crate) fn from_binding(binding: Binding) -> Self {
        Self {
            binding: binding.with_direct_call(true),
        }
    }

    /// Look up an item by id
    ///
    /// Reads `prop:srcid` and `prop:sceneid`; fails with `NotFound` when
    /// the host knows no such item.
    pub async fn resolve(host: &Host, item_id: &str) -> Result<Item> {
        let identity = resolve_identity(host, item_id).await?;
        Ok(Self::from_binding(Binding::new(
            host.clone(),
            identity,
            PropertyBag::new(),
            true,
        )))
    }

    /// Build an item from its serialized `<item/>` form
    ///
    /// Hosts without linked sources omit `srcid`; the item id stands in for
    /// it there, since every source has exactly one item.
    pub fn from_xml(host: &Host, xml: &str, scene_index: u32) -> Result<Item> {
        let bag = PropertyBag::from_item_xml(xml)?;
        let item_id = bag
            .get("id")
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Xml("item has no id".to_string()))?
            .to_string();
        let source_id = bag
            .get("srcid")
            .filter(|id| !id.is_empty())
            .unwrap_or(&item_id)
            .to_string();

        let identity = Identity::new(item_id, scene_index, source_id);
        Ok(Self::from_binding(Binding::new(
            host.clone(),
            identity,
            bag,
            true,
        )))
    }

    pub fn id(&self) -> &str {
        &self.binding.identity().item_id
    }

    pub fn source_id(&self) -> &str {
        &self.binding.identity().source_id
    }

    /// 0-based scene index
    pub fn scene_index(&self) -> u32 {
        self.binding.identity().scene_index
    }

    /// 1-based scene number
    pub fn scene_number(&self) -> u32 {
        self.binding.identity().scene_number()
    }

    pub fn scene(&self) -> Scene {
        Scene::from_index(self.scene_index())
    }

    pub fn identity(&self) -> &Identity {
        self.binding.identity()
    }

    pub fn host(&self) -> &Host {
        self.binding.host()
    }

    pub fn is_direct_call(&self) -> bool {
        self.binding.is_direct_call()
    }

    /// Last known value of a property, without a round trip
    pub fn cached_property(&self, key: &str) -> Option<String> {
        self.binding.cached(key)
    }

    /// Serialized `<item/>` form: source properties plus this placement
    pub fn to_xml(&self) -> String {
        self.binding.to_item_xml()
    }

    /// Point this object at another placement of its source
    ///
    /// For accessors that discover the cached item id is stale. The source
    /// id never changes here.
    pub fn rebind(&mut self, item_id: impl Into<String>, scene_index: u32) -> &mut Self {
        self.binding.rebind(item_id.into(), scene_index);
        self
    }

    /// Classify the view this item renders in
    pub async fn view(&self) -> Result<ViewKind> {
        resolve_view(self.binding.host(), self.id()).await
    }

    /// The classified source of this item
    ///
    /// Classifies the sources of every item linked to this one and returns
    /// the first. Linked items normally share one source, but if the host
    /// ever reports several, only the first is returned.
    pub async fn source(&self) -> Result<TypedSource> {
        let items = self.item_list().await?;
        resolver::first_source(&items).await
    }
}

impl Bound for Item {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }
}

impl SourceProperties for Item {}

impl ItemLayout for Item {}

/// Items are equal when they render the same source
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.source_id() == other.source_id()
    }
}
