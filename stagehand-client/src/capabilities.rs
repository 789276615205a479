//! Capability traits attached to Item and Source types
//!
//! Each concrete type opts into a fixed set of capabilities by implementing
//! these traits; every method has a default body written against
//! [`Bound`]. Setters mutate the object in place and hand the same
//! reference back so calls can be chained with `?`:
//!
//! ```rust,ignore
//! item.set_keep_aspect_ratio(true).await?.set_position_locked(true).await?;
//! ```
//!
//! Callers must not assume a new instance: a rebind performed by one call
//! is visible to the next.

use crate::binding::Bound;
use crate::item::Item;
use crate::rectangle::Rectangle;
use crate::source::{ItemValue, SourceTypeCode};
use crate::{Error, Result};
use async_trait::async_trait;
use futures::future::try_join_all;

/// Host encoding of a boolean property
pub(crate) fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

pub(crate) fn is_set(raw: &str) -> bool {
    raw.trim() == "1"
}

/// Properties of the underlying source
///
/// Values written here are shared by every item linked to the source.
#[async_trait]
pub trait SourceProperties: Bound {
    async fn name(&mut self) -> Result<String> {
        self.binding_mut().source_get("prop:name").await
    }

    async fn set_name(&mut self, name: &str) -> Result<&mut Self> {
        self.binding_mut().source_set("prop:name", name).await?;
        Ok(self)
    }

    /// Display name shown in the host's source list
    async fn custom_name(&mut self) -> Result<String> {
        self.binding_mut().source_get("prop:cname").await
    }

    async fn set_custom_name(&mut self, name: &str) -> Result<&mut Self> {
        self.binding_mut().source_set("prop:cname", name).await?;
        Ok(self)
    }

    /// The `item` property: a locator or an XML description
    async fn value(&mut self) -> Result<ItemValue> {
        let raw = self.binding_mut().source_get("prop:item").await?;
        Ok(ItemValue::parse(&raw))
    }

    async fn set_value(&mut self, value: ItemValue) -> Result<&mut Self> {
        self.binding_mut()
            .source_set("prop:item", &value.to_wire())
            .await?;
        Ok(self)
    }

    /// Whether the source stays loaded while not visible in any scene
    async fn keep_loaded(&mut self) -> Result<bool> {
        let raw = self.binding_mut().source_get("prop:keeploaded").await?;
        Ok(is_set(&raw))
    }

    async fn set_keep_loaded(&mut self, value: bool) -> Result<&mut Self> {
        self.binding_mut()
            .source_set("prop:keeploaded", flag(value))
            .await?;
        Ok(self)
    }

    async fn source_type(&mut self) -> Result<SourceTypeCode> {
        let raw = self.binding_mut().source_get("prop:type").await?;
        Ok(SourceTypeCode::parse(&raw))
    }

    /// Ask the host to reload the source
    async fn refresh(&mut self) -> Result<&mut Self> {
        self.binding_mut().source_set("refresh", "").await?;
        Ok(self)
    }

    /// Every item linked to this source
    ///
    /// Hosts older than linked sources have exactly one item per source, so
    /// the answer there is this object's own item.
    async fn item_list(&self) -> Result<Vec<Item>> {
        let binding = self.binding();
        let host = binding.host();

        if !host.supports_linked_sources() {
            return Ok(vec![Item::from_binding(binding.with_direct_call(true))]);
        }

        let ids = binding.linked_item_ids().await?;
        if ids.is_empty() {
            return Err(Error::NotFound(format!(
                "no items linked to source {}",
                binding.identity().source_id
            )));
        }
        try_join_all(ids.iter().map(|id| Item::resolve(host, id))).await
    }
}

/// Layout of one placement
///
/// None of these properties propagate to other items linked to the same
/// source.
#[async_trait]
pub trait ItemLayout: Bound {
    async fn keep_aspect_ratio(&mut self) -> Result<bool> {
        let raw = self.binding_mut().item_get("prop:keep").await?;
        Ok(is_set(&raw))
    }

    async fn set_keep_aspect_ratio(&mut self, value: bool) -> Result<&mut Self> {
        self.binding_mut().item_set("prop:keep", flag(value)).await?;
        Ok(self)
    }

    async fn position_locked(&mut self) -> Result<bool> {
        let raw = self.binding_mut().item_get("prop:lockmove").await?;
        Ok(is_set(&raw))
    }

    async fn set_position_locked(&mut self, value: bool) -> Result<&mut Self> {
        self.binding_mut()
            .item_set("prop:lockmove", flag(value))
            .await?;
        Ok(self)
    }

    async fn enhanced_resize(&mut self) -> Result<bool> {
        let raw = self.binding_mut().item_get("prop:mipmaps").await?;
        Ok(is_set(&raw))
    }

    async fn set_enhanced_resize(&mut self, value: bool) -> Result<&mut Self> {
        self.binding_mut()
            .item_set("prop:mipmaps", flag(value))
            .await?;
        Ok(self)
    }

    /// Position as fractions of the stage
    async fn position(&mut self) -> Result<Rectangle> {
        let raw = self.binding_mut().item_get("prop:pos").await?;
        Rectangle::parse_coordinates(&raw).map_err(|_| Error::UnexpectedResponse {
            key: "prop:pos".to_string(),
            value: raw,
        })
    }

    async fn set_position(&mut self, position: Rectangle) -> Result<&mut Self> {
        self.binding_mut()
            .item_set("prop:pos", &position.to_coordinate_string())
            .await?;
        Ok(self)
    }

    /// Rotation around the z axis in degrees
    async fn rotate_z(&mut self) -> Result<i32> {
        let raw = self.binding_mut().item_get("prop:rotate_z").await?;
        if raw.trim().is_empty() {
            return Ok(0);
        }
        raw.trim()
            .parse::<i32>()
            .map_err(|_| Error::UnexpectedResponse {
                key: "prop:rotate_z".to_string(),
                value: raw,
            })
    }

    async fn set_rotate_z(&mut self, degrees: i32) -> Result<&mut Self> {
        if !(-180..=180).contains(&degrees) {
            return Err(Error::InvalidParameters(format!(
                "rotation must be within -180..=180, got {}",
                degrees
            )));
        }
        self.binding_mut()
            .item_set("prop:rotate_z", &degrees.to_string())
            .await?;
        Ok(self)
    }
}
