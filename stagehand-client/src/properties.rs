//! Raw property bags and the serialized `<item/>` form
//!
//! A property bag holds the attributes of one item as the host reports them.
//! Bridge keys address the same values with an optional `prop:` prefix, so
//! `prop:name` and `name` name one property.

use crate::{Error, Result};
use std::collections::BTreeMap;

/// Properties that describe one placement and never propagate to other
/// items linked to the same source.
pub const ITEM_LEVEL_KEYS: &[&str] = &[
    "id", "srcid", "sceneid", "viewid", "pos", "keep", "lockmove", "mipmaps", "rotate_z",
    "globalsrc",
];

/// Strip the `prop:` prefix from a bridge key
pub fn attribute_name(key: &str) -> &str {
    key.strip_prefix("prop:").unwrap_or(key)
}

/// `true` when `key` addresses per-placement state rather than the source
pub fn is_item_level(key: &str) -> bool {
    ITEM_LEVEL_KEYS.contains(&attribute_name(key))
}

/// Attribute map of one item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    entries: BTreeMap<String, String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property by attribute name or bridge key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(attribute_name(key)).map(String::as_str)
    }

    /// Value or empty string, mirroring how the host reports unset properties
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.entries
            .insert(attribute_name(key).to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(attribute_name(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(attribute_name(key))
    }

    /// Copy every entry of `other` over this bag
    pub fn merge(&mut self, other: &PropertyBag) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse the attributes of an `<item .../>` element
    pub fn from_item_xml(xml: &str) -> Result<Self> {
        let (tag, bag) = Self::from_element_xml(xml)?;
        if tag != "item" {
            return Err(Error::Xml(format!("expected <item>, found <{}>", tag)));
        }
        Ok(bag)
    }

    /// Parse the root element of `xml` into its tag name and attributes
    pub fn from_element_xml(xml: &str) -> Result<(String, Self)> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| Error::Xml(format!("parse error: {}", e)))?;

        let root = doc.root_element();
        let mut bag = PropertyBag::new();
        for attr in root.attributes() {
            bag.insert(attr.name(), attr.value());
        }
        Ok((root.tag_name().name().to_string(), bag))
    }

    /// Serialize as a self-closing `<item .../>` element
    pub fn to_item_xml(&self) -> String {
        self.to_element_xml("item")
    }

    /// Serialize as a self-closing element named `tag`
    pub fn to_element_xml(&self, tag: &str) -> String {
        let mut out = format!("<{}", tag);
        for (k, v) in &self.entries {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape_xml(v));
            out.push('"');
        }
        out.push_str("/>");
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = PropertyBag::new();
        for (k, v) in iter {
            let k = k.into();
            bag.insert(&k, v);
        }
        bag
    }
}

/// Escape attribute text
pub(crate) fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            '\n' => result.push_str("&#10;"),
            _ => result.push(c),
        }
    }
    result
}
