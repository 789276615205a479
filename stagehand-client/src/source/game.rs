//! Game capture sources

use super::{ItemValue, Source};
use crate::binding::{Binding, Bound};
use crate::capabilities::{flag, is_set, SourceProperties};
use crate::{Error, Result};
use tracing::info;

const SURFACE_SHARING: &str = "GameCapSurfSharing";
const SHOW_MOUSE: &str = "GameCapShowMouse";

/// Attribute of the value element naming the offline image
const OFFLINE_IMAGE_ATTRIBUTE: &str = "replace";

const IMAGE_EXTENSIONS: &[&str] = &["png", "gif", "jpg", "jpeg", "tif"];

#[derive(Debug, Clone)]
pub struct GameSource {
    source: Source,
}

impl GameSource {
    pub(crate) fn new(source: Source) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut Source {
        &mut self.source
    }

    pub fn into_source(self) -> Source {
        self.source
    }

    pub async fn special_optimization(&mut self) -> Result<bool> {
        let raw = self.binding_mut().source_get(SURFACE_SHARING).await?;
        Ok(is_set(&raw))
    }

    pub async fn set_special_optimization(&mut self, enabled: bool) -> Result<&mut Self> {
        self.binding_mut()
            .source_set(SURFACE_SHARING, flag(enabled))
            .await?;
        Ok(self)
    }

    pub async fn show_mouse(&mut self) -> Result<bool> {
        let raw = self.binding_mut().source_get(SHOW_MOUSE).await?;
        Ok(is_set(&raw))
    }

    pub async fn set_show_mouse(&mut self, enabled: bool) -> Result<&mut Self> {
        self.binding_mut()
            .source_set(SHOW_MOUSE, flag(enabled))
            .await?;
        Ok(self)
    }

    /// Image shown while the game is not running, empty when unset
    pub async fn offline_image(&mut self) -> Result<String> {
        let value = self.value().await?;
        Ok(value
            .as_element()
            .and_then(|element| element.attribute(OFFLINE_IMAGE_ATTRIBUTE))
            .unwrap_or("")
            .to_string())
    }

    /// Set the offline image; an empty path clears it
    ///
    /// Source plugins may not change it.
    pub async fn set_offline_image(&mut self, path: &str) -> Result<&mut Self> {
        if self.binding().host().is_source_plugin() {
            return Err(Error::InvalidState(
                "source plugins cannot update offline images of other items".to_string(),
            ));
        }
        if !path.is_empty() && !is_offline_image_path(path) {
            return Err(Error::InvalidParameters(format!(
                "not a local or network image path: {:?}",
                path
            )));
        }

        let mut element = match self.value().await? {
            ItemValue::Element(element) => element,
            ItemValue::Text(raw) => {
                return Err(Error::UnexpectedResponse {
                    key: "prop:item".to_string(),
                    value: raw,
                })
            }
        };
        element.set_attribute(OFFLINE_IMAGE_ATTRIBUTE, path);
        self.set_value(ItemValue::Element(element)).await?;

        info!(
            "Offline image of source {} set to {:?}",
            self.source.source_id(),
            path
        );
        Ok(self)
    }
}

impl Bound for GameSource {
    fn binding(&self) -> &Binding {
        self.source.binding()
    }

    fn binding_mut(&mut self) -> &mut Binding {
        self.source.binding_mut()
    }
}

impl SourceProperties for GameSource {}

/// Windows image path accepted as an offline image
///
/// Drive paths (`C:\...`), UNC paths (`\\server\...`) and paths rooted at a
/// named location (`Pictures\...`), ending in a supported lowercase
/// extension.
fn is_offline_image_path(path: &str) -> bool {
    let Some((stem, extension)) = path.rsplit_once('.') else {
        return false;
    };
    if !IMAGE_EXTENSIONS.contains(&extension) {
        return false;
    }

    let plain = |s: &str| !s.contains(['*', '|', '"', '<', '>', '?', '\n']);

    if let Some(rest) = stem.strip_prefix("\\\\") {
        return !stem.contains('\n') && rest.contains('\\');
    }

    let mut chars = stem.chars();
    if let (Some(drive), Some(':'), Some('\\')) = (chars.next(), chars.next(), chars.next()) {
        if drive.is_ascii_alphabetic() {
            return plain(chars.as_str());
        }
    }

    match stem.split_once('\\') {
        Some((root, rest)) => {
            !root.is_empty() && root.chars().all(|c| c.is_ascii_alphabetic()) && plain(rest)
        }
        None => false,
    }
}
