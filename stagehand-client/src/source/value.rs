//! The `item` property: a plain locator or an XML element

use crate::properties::PropertyBag;
use crate::Result;
use std::fmt;

/// A single XML element carried in the `item` property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueElement {
    pub name: String,
    pub attributes: PropertyBag,
}

impl ValueElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: PropertyBag::new(),
        }
    }

    pub fn parse(xml: &str) -> Result<Self> {
        let (name, attributes) = PropertyBag::from_element_xml(xml)?;
        Ok(Self { name, attributes })
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn to_xml(&self) -> String {
        self.attributes.to_element_xml(&self.name)
    }
}

/// Value of a source's `item` property
///
/// File paths, URLs and device ids come back as text. Game and screen
/// sources describe themselves with an element such as
/// `<src pid="..." replace="C:\offline.png"/>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValue {
    Text(String),
    Element(ValueElement),
}

impl ItemValue {
    /// Interpret a raw host answer
    ///
    /// Anything that does not parse as a single element stays text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with('<') {
            if let Ok(element) = ValueElement::parse(trimmed) {
                return ItemValue::Element(element);
            }
        }
        ItemValue::Text(raw.to_string())
    }

    pub fn as_element(&self) -> Option<&ValueElement> {
        match self {
            ItemValue::Element(element) => Some(element),
            ItemValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ItemValue::Text(text) => Some(text),
            ItemValue::Element(_) => None,
        }
    }

    /// Wire form written back through `prop:item`
    pub fn to_wire(&self) -> String {
        match self {
            ItemValue::Text(text) => text.clone(),
            ItemValue::Element(element) => element.to_xml(),
        }
    }
}

impl fmt::Display for ItemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl From<&str> for ItemValue {
    fn from(text: &str) -> Self {
        ItemValue::Text(text.to_string())
    }
}

impl From<String> for ItemValue {
    fn from(text: String) -> Self {
        ItemValue::Text(text)
    }
}

impl From<ValueElement> for ItemValue {
    fn from(element: ValueElement) -> Self {
        ItemValue::Element(element)
    }
}
