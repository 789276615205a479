//! In-memory host
//!
//! [`MemoryHost`] implements [`CallBridge`] over a small model of the host:
//! scenes of items, shared sources, global flags. It understands the same
//! call vocabulary as the real host (`itemlist`, `prop:globalsrc`,
//! `additem`, `link:N|s:M|additem`, `addurl`), records every round trip and
//! can be told to fail or delay calls. Useful for tests and for running
//! client code without a host.

use crate::bridge::{BridgeCall, CallBridge};
use crate::properties::{attribute_name, is_item_level, PropertyBag};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct MemoryItem {
    id: String,
    scene_index: u32,
    source_id: String,
    layout: PropertyBag,
}

#[derive(Debug, Default)]
struct State {
    /// Placement order across all scenes
    items: Vec<MemoryItem>,
    sources: HashMap<String, PropertyBag>,
    globals: HashMap<String, String>,
    current_scene: u32,
    calls: Vec<BridgeCall>,
    /// Call label -> transport failure message
    failures: HashMap<String, String>,
    latency: Option<Duration>,
}

impl State {
    fn item(&self, id: &str) -> Option<&MemoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn item_mut(&mut self, id: &str) -> Option<&mut MemoryItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    fn linked_count(&self, source_id: &str) -> usize {
        self.items
            .iter()
            .filter(|item| item.source_id == source_id)
            .count()
    }

    fn place(&mut self, scene_index: u32, source_id: String, layout: PropertyBag) -> String {
        let id = new_id();
        self.items.push(MemoryItem {
            id: id.clone(),
            scene_index,
            source_id,
            layout,
        });
        id
    }

    fn new_source(&mut self, properties: PropertyBag) -> String {
        let source_id = new_id();
        self.sources.insert(source_id.clone(), properties);
        source_id
    }
}

fn new_id() -> String {
    format!("{{{}}}", Uuid::new_v4().to_string().to_uppercase())
}

/// A scripted host living in process memory
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<State>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new item with its own source in scene `scene_index` (0-based)
    ///
    /// Item-level keys in `properties` become the placement's layout; the
    /// rest seed the source. Returns the item id.
    pub fn add_item(&self, scene_index: u32, properties: &[(&str, &str)]) -> String {
        let (layout, source) = split(properties.iter().copied().collect());
        let mut state = self.state.lock().unwrap();
        let source_id = state.new_source(source);
        state.place(scene_index, source_id, layout)
    }

    /// Place another item rendering the source of `item_id`
    ///
    /// Returns `None` when `item_id` is unknown.
    pub fn add_linked_item(&self, item_id: &str, scene_index: u32) -> Option<String> {
        let mut state = self.state.lock().unwrap();
        let source_id = state.item(item_id)?.source_id.clone();
        Some(state.place(scene_index, source_id, PropertyBag::new()))
    }

    /// Delete an item, and its source when nothing else renders it
    pub fn remove_item(&self, item_id: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        let Some(pos) = state.items.iter().position(|item| item.id == item_id) else {
            return false;
        };
        let removed = state.items.remove(pos);
        if state.linked_count(&removed.source_id) == 0 {
            state.sources.remove(&removed.source_id);
        }
        true
    }

    pub fn set_global(&self, key: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .globals
            .insert(key.to_string(), value.to_string());
    }

    /// Scene new items land in when a call names none (0-based)
    pub fn set_current_scene(&self, scene_index: u32) {
        self.state.lock().unwrap().current_scene = scene_index;
    }

    /// Fail every call with this label (`"get prop:name"`, `"callFunc additem"`)
    pub fn fail_on(&self, label: &str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(label.to_string(), message.to_string());
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    /// Delay every answer by `latency`
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.state.lock().unwrap().latency = latency;
    }

    /// Every round trip so far, oldest first
    pub fn calls(&self) -> Vec<BridgeCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Names of every `callFunc` so far
    pub fn func_calls(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|call| call.func_name().map(str::to_string))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn source_of(&self, item_id: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.item(item_id).map(|item| item.source_id.clone())
    }

    pub fn scene_of(&self, item_id: &str) -> Option<u32> {
        let state = self.state.lock().unwrap();
        state.item(item_id).map(|item| item.scene_index)
    }

    /// Item ids in placement order
    pub fn item_ids(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Property as the host would answer `get(key, item_id)`
    pub fn property(&self, item_id: &str, key: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        let item = state.item(item_id)?;
        Some(read_property(&state, item, key))
    }

    pub fn source_count(&self) -> usize {
        self.state.lock().unwrap().sources.len()
    }

    /// Record `call`, then wait out the latency and apply failure injection
    async fn enter(&self, call: BridgeCall) -> Result<()> {
        let label = call.label();
        let (latency, failure) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call);
            (state.latency, state.failures.get(&label).cloned())
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(message) => Err(Error::transport(label, message)),
            None => Ok(()),
        }
    }

    fn add_item_call(
        state: &mut State,
        link: bool,
        scene_index: u32,
        argument: &str,
    ) -> Result<String> {
        let bag = PropertyBag::from_item_xml(argument)?;
        let (mut layout, properties) = split(bag.clone());
        for key in ["id", "srcid", "sceneid", "globalsrc"] {
            layout.remove(key);
        }

        let linked_source = bag
            .get("srcid")
            .filter(|id| link && state.sources.contains_key(*id))
            .map(str::to_string);

        let source_id = match linked_source {
            Some(source_id) => source_id,
            None => state.new_source(properties),
        };
        Ok(state.place(scene_index, source_id, layout))
    }
}

fn split(bag: PropertyBag) -> (PropertyBag, PropertyBag) {
    let mut layout = PropertyBag::new();
    let mut source = PropertyBag::new();
    for (k, v) in bag.iter() {
        if is_item_level(k) {
            layout.insert(k, v);
        } else {
            source.insert(k, v);
        }
    }
    (layout, source)
}

fn read_property(state: &State, item: &MemoryItem, key: &str) -> String {
    match attribute_name(key) {
        "id" => item.id.clone(),
        "srcid" => item.source_id.clone(),
        "sceneid" => item.scene_index.to_string(),
        name if is_item_level(name) => item.layout.get_or_empty(name).to_string(),
        name => state
            .sources
            .get(&item.source_id)
            .map(|bag| bag.get_or_empty(name).to_string())
            .unwrap_or_default(),
    }
}

/// Parse `link:N|s:M|additem` style names into (link, scene number, function)
fn parse_func_name(name: &str) -> Result<(bool, Option<u32>, &str)> {
    let mut link = false;
    let mut scene = None;
    let mut segments = name.split('|').peekable();
    let mut function = "";

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            function = segment;
        } else if let Some(value) = segment.strip_prefix("link:") {
            link = value == "1";
        } else if let Some(value) = segment.strip_prefix("s:") {
            let number = value
                .parse::<u32>()
                .ok()
                .ok_or_else(|| Error::transport(format!("callFunc {}", name), "bad scene"))?;
            scene = Some(number);
        } else {
            return Err(Error::transport(
                format!("callFunc {}", name),
                format!("unknown segment {}", segment),
            ));
        }
    }
    Ok((link, scene, function))
}

#[async_trait]
impl CallBridge for MemoryHost {
    async fn get(&self, key: &str, id: &str) -> Result<String> {
        self.enter(BridgeCall::Get {
            key: key.to_string(),
            id: id.to_string(),
        })
        .await?;

        let state = self.state.lock().unwrap();
        if key == "itemlist" {
            let ids: Vec<&str> = state
                .items
                .iter()
                .filter(|item| item.source_id == id)
                .map(|item| item.id.as_str())
                .collect();
            return Ok(ids.join(","));
        }

        Ok(state
            .item(id)
            .map(|item| read_property(&state, item, key))
            .unwrap_or_default())
    }

    async fn set(&self, key: &str, value: &str, id: &str) -> Result<()> {
        self.enter(BridgeCall::Set {
            key: key.to_string(),
            value: value.to_string(),
            id: id.to_string(),
        })
        .await?;

        let mut state = self.state.lock().unwrap();
        let Some(item) = state.item(id).cloned() else {
            return Err(Error::transport(
                format!("set {}", key),
                format!("no item {}", id),
            ));
        };

        let name = attribute_name(key);
        if name == "globalsrc" && value == "0" && state.linked_count(&item.source_id) > 1 {
            let copy = state
                .sources
                .get(&item.source_id)
                .cloned()
                .unwrap_or_default();
            let source_id = state.new_source(copy);
            debug!("{} split from {} into {}", id, item.source_id, source_id);
            if let Some(item) = state.item_mut(id) {
                item.source_id = source_id;
            }
        }

        match name {
            "id" | "srcid" | "sceneid" => {}
            name if is_item_level(name) => {
                if let Some(item) = state.item_mut(id) {
                    item.layout.insert(name, value);
                }
            }
            "refresh" => {}
            name => {
                let source_id = state
                    .item(id)
                    .map(|item| item.source_id.clone())
                    .unwrap_or(item.source_id);
                state
                    .sources
                    .entry(source_id)
                    .or_default()
                    .insert(name, value);
            }
        }
        Ok(())
    }

    async fn get_global_property(&self, key: &str) -> Result<String> {
        self.enter(BridgeCall::GetGlobal {
            key: key.to_string(),
        })
        .await?;

        let state = self.state.lock().unwrap();
        Ok(state.globals.get(key).cloned().unwrap_or_default())
    }

    async fn call_func(&self, name: &str, argument: &str) -> Result<String> {
        self.enter(BridgeCall::CallFunc {
            name: name.to_string(),
            argument: argument.to_string(),
        })
        .await?;

        let (link, scene, function) = parse_func_name(name)?;
        let mut state = self.state.lock().unwrap();
        // `s:0` carries an internal scene id and lands in the first scene
        let scene_index = scene
            .map(|n| n.saturating_sub(1))
            .unwrap_or(state.current_scene);

        match function {
            "additem" => Self::add_item_call(&mut state, link, scene_index, argument),
            "addurl" => {
                let source: PropertyBag = [("type", "8"), ("name", argument), ("item", argument)]
                    .into_iter()
                    .collect();
                let source_id = state.new_source(source);
                Ok(state.place(scene_index, source_id, PropertyBag::new()))
            }
            other => Err(Error::transport(
                format!("callFunc {}", name),
                format!("unknown function {}", other),
            )),
        }
    }
}
