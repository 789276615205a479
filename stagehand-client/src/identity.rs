//! Item/Source identity and the shared source record
//!
//! One [`SourceRecord`] exists per live source id within a [`Host`]
//! session. Every Item or Source object bound to that id holds the same
//! `Arc`, so a property written through one of them is visible through all
//! of them without another round trip. Per-placement state (position,
//! locks, view) stays with each object and is never shared.

use crate::host::Host;
use crate::properties::PropertyBag;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, Weak};

/// Who an object currently points at on the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub item_id: String,
    /// 0-based scene index
    pub scene_index: u32,
    pub source_id: String,
}

impl Identity {
    pub fn new(item_id: impl Into<String>, scene_index: u32, source_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            scene_index,
            source_id: source_id.into(),
        }
    }

    /// 1-based scene number
    pub fn scene_number(&self) -> u32 {
        self.scene_index + 1
    }
}

/// Shared state of one source
///
/// `source_id` never changes after creation. The property bag is written
/// by whichever bound object last talked to the host; the host remains the
/// arbiter of the real value.
#[derive(Debug)]
pub struct SourceRecord {
    source_id: String,
    properties: RwLock<PropertyBag>,
}

impl SourceRecord {
    fn new(source_id: String, properties: PropertyBag) -> Self {
        Self {
            source_id,
            properties: RwLock::new(properties),
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Last known value of a source property
    pub fn property(&self, key: &str) -> Option<String> {
        self.properties
            .read()
            .unwrap()
            .get(key)
            .map(str::to_string)
    }

    /// Snapshot of the whole bag
    pub fn properties(&self) -> PropertyBag {
        self.properties.read().unwrap().clone()
    }

    pub(crate) fn store(&self, key: &str, value: &str) {
        self.properties.write().unwrap().insert(key, value);
    }

    pub(crate) fn merge(&self, bag: &PropertyBag) {
        self.properties.write().unwrap().merge(bag);
    }
}

/// Interns one [`SourceRecord`] per source id
///
/// Holds weak references only; a record lives as long as some object is
/// bound to it.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    entries: Mutex<HashMap<String, Weak<SourceRecord>>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for `source_id`, creating it if no live one exists
    ///
    /// `properties` is merged into an existing record, so fresher host data
    /// reaches every aliased object.
    pub fn intern(&self, source_id: &str, properties: PropertyBag) -> Arc<SourceRecord> {
        let mut entries = self.entries.lock().unwrap();

        if let Some(existing) = entries.get(source_id).and_then(Weak::upgrade) {
            existing.merge(&properties);
            return existing;
        }

        entries.retain(|_, weak| weak.strong_count() > 0);
        let record = Arc::new(SourceRecord::new(source_id.to_string(), properties));
        entries.insert(source_id.to_string(), Arc::downgrade(&record));
        record
    }

    /// Number of source records currently alive
    pub fn live_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

/// Parse a comma-separated `itemlist` answer
pub(crate) fn split_item_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the 0-based scene index of an item
pub(crate) async fn read_scene_index(host: &Host, item_id: &str) -> Result<u32> {
    let raw = host.get("prop:sceneid", item_id).await?;
    raw.trim()
        .parse::<u32>()
        .map_err(|_| Error::UnexpectedResponse {
            key: "prop:sceneid".to_string(),
            value: raw,
        })
}

/// Resolve an item id to its full identity with two round trips
pub(crate) async fn resolve_identity(host: &Host, item_id: &str) -> Result<Identity> {
    let source_id = host.get("prop:srcid", item_id).await?;
    if source_id.trim().is_empty() {
        return Err(Error::NotFound(format!("item {}", item_id)));
    }
    let scene_index = read_scene_index(host, item_id).await?;
    Ok(Identity::new(item_id, scene_index, source_id.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_shares_live_records() {
        let registry = SourceRegistry::new();
        let a = registry.intern("{S1}", [("name", "Cam")].into_iter().collect());
        let b = registry.intern("{S1}", [("type", "2")].into_iter().collect());

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.property("name").as_deref(), Some("Cam"));
        assert_eq!(a.property("type").as_deref(), Some("2"));

        b.store("name", "Renamed");
        assert_eq!(a.property("name").as_deref(), Some("Renamed"));
    }

    #[test]
    fn test_registry_drops_dead_records() {
        let registry = SourceRegistry::new();
        let a = registry.intern("{S1}", PropertyBag::new());
        assert_eq!(registry.live_count(), 1);
        drop(a);
        assert_eq!(registry.live_count(), 0);

        // A fresh record starts from the new bag only
        let b = registry.intern("{S1}", [("name", "New")].into_iter().collect());
        assert_eq!(b.properties().len(), 1);
    }

    #[test]
    fn test_split_item_list() {
        assert_eq!(split_item_list("{A}, {B},,"), vec!["{A}", "{B}"]);
        assert!(split_item_list("").is_empty());
    }

    #[test]
    fn test_scene_number_is_one_based() {
        let identity = Identity::new("{A}", 0, "{S}");
        assert_eq!(identity.scene_number(), 1);
    }
}
