//! Screen capture sources

use super::{ItemValue, Source, ValueElement};
use crate::binding::{Binding, Bound};
use crate::capabilities::{flag, is_set, SourceProperties};
use crate::rectangle::Rectangle;
use crate::{Error, Result};

const CAPTURE_LAYERED: &str = "prop:ScrCapLayered";
const OPTIMIZED_CAPTURE: &str = "prop:ScrCapOptCapture1";
const SHOW_CLICKS: &str = "prop:ScrCapShowClicks";
const SHOW_MOUSE: &str = "prop:ScrCapShowMouse";

/// Window handle of a capture that follows its window by title
const TITLE_HANDLE: &str = "0";

#[derive(Debug, Clone)]
pub struct ScreenSource {
    source: Source,
}

impl ScreenSource {
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

    pub async fn capture_layered(&mut self) -> Result<bool> {
        self.read_flag(CAPTURE_LAYERED).await
    }

    pub async fn set_capture_layered(&mut self, enabled: bool) -> Result<&mut Self> {
        self.write_flag(CAPTURE_LAYERED, enabled).await
    }

    pub async fn optimized_capture(&mut self) -> Result<bool> {
        self.read_flag(OPTIMIZED_CAPTURE).await
    }

    pub async fn set_optimized_capture(&mut self, enabled: bool) -> Result<&mut Self> {
        self.write_flag(OPTIMIZED_CAPTURE, enabled).await
    }

    pub async fn show_mouse_clicks(&mut self) -> Result<bool> {
        self.read_flag(SHOW_CLICKS).await
    }

    pub async fn set_show_mouse_clicks(&mut self, enabled: bool) -> Result<&mut Self> {
        self.write_flag(SHOW_CLICKS, enabled).await
    }

    pub async fn show_mouse(&mut self) -> Result<bool> {
        self.read_flag(SHOW_MOUSE).await
    }

    pub async fn set_show_mouse(&mut self, enabled: bool) -> Result<&mut Self> {
        self.write_flag(SHOW_MOUSE, enabled).await
    }

    /// Whether only the client area of the window is captured
    pub async fn client_area(&mut self) -> Result<bool> {
        let element = self.screen_element().await?;
        Ok(is_set(element.attribute("wclient").unwrap_or("")))
    }

    pub async fn set_client_area(&mut self, enabled: bool) -> Result<&mut Self> {
        let mut element = self.screen_element().await?;
        element.set_attribute("wclient", flag(enabled));
        self.set_value(ItemValue::Element(element)).await?;
        Ok(self)
    }

    /// Whether the capture follows its window by title instead of handle
    pub async fn stick_to_title(&mut self) -> Result<bool> {
        let element = self.screen_element().await?;
        Ok(element.attribute("hwnd") == Some(TITLE_HANDLE))
    }

    /// Follow the window by title
    ///
    /// Only switching on is possible: the window handle is lost once
    /// cleared, so switching off fails with `InvalidState` unless the
    /// capture already follows a handle.
    pub async fn set_stick_to_title(&mut self, enabled: bool) -> Result<&mut Self> {
        let mut element = self.screen_element().await?;
        let sticking = element.attribute("hwnd") == Some(TITLE_HANDLE);
        match (enabled, sticking) {
            (true, true) | (false, false) => Ok(self),
            (true, false) => {
                element.set_attribute("hwnd", TITLE_HANDLE);
                self.set_value(ItemValue::Element(element)).await?;
                Ok(self)
            }
            (false, true) => Err(Error::InvalidState(
                "capture has no window handle to stick to".to_string(),
            )),
        }
    }

    /// Captured region of the screen in pixels
    pub async fn capture_area(&mut self) -> Result<Rectangle> {
        let element = self.screen_element().await?;
        let number = |name: &str| -> Result<f64> {
            let raw = element.attribute(name).unwrap_or("0");
            raw.trim()
                .parse::<f64>()
                .map_err(|_| Error::UnexpectedResponse {
                    key: format!("prop:item@{}", name),
                    value: raw.to_string(),
                })
        };
        let (left, top) = (number("left")?, number("top")?);
        let (width, height) = (number("width")?, number("height")?);
        Rectangle::from_coordinates(left, top, left + width, top + height)
    }

    pub async fn set_capture_area(&mut self, area: Rectangle) -> Result<&mut Self> {
        let mut element = self.screen_element().await?;
        element
            .set_attribute("left", area.left().to_string())
            .set_attribute("top", area.top().to_string())
            .set_attribute("width", area.width().to_string())
            .set_attribute("height", area.height().to_string());
        self.set_value(ItemValue::Element(element)).await?;
        Ok(self)
    }

    async fn read_flag(&mut self, key: &str) -> Result<bool> {
        let raw = self.binding_mut().source_get(key).await?;
        Ok(is_set(&raw))
    }

    async fn write_flag(&mut self, key: &str, enabled: bool) -> Result<&mut Self> {
        self.binding_mut().source_set(key, flag(enabled)).await?;
        Ok(self)
    }

    async fn screen_element(&mut self) -> Result<ValueElement> {
        match self.value().await? {
            ItemValue::Element(element) => Ok(element),
            ItemValue::Text(raw) => Err(Error::UnexpectedResponse {
                key: "prop:item".to_string(),
                value: raw,
            }),
        }
    }
}

impl Bound for ScreenSource {
    fn binding(&self) -> &Binding {
        self.source.binding()
    }

    fn binding_mut(&mut self) -> &mut Binding {
        self.source.binding_mut()
    }
}

impl SourceProperties for ScreenSource {}
