//! Source type codes and variant classification

use crate::properties::PropertyBag;
use serde::{Deserialize, Serialize};

/// Name prefix the host gives video playlist sources
pub const VIDEO_PLAYLIST_PREFIX: &str = "Video Playlist";

/// Property holding the playlist of a video playlist source
pub const PLAYLIST_PROPERTY: &str = "FilePlaylist";

/// Device GUID marking a live source as an audio capture device
pub const AUDIO_DEVICE_GUID: &str = "{33D9A762-90C8-11D0-BD43-00A0C911CE86}";

/// Raw type code reported by the host in the `type` property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTypeCode {
    Undefined,
    File,
    Live,
    Text,
    Bitmap,
    Screen,
    FlashFile,
    GameSource,
    Html,
}

impl SourceTypeCode {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => SourceTypeCode::File,
            2 => SourceTypeCode::Live,
            3 => SourceTypeCode::Text,
            4 => SourceTypeCode::Bitmap,
            5 => SourceTypeCode::Screen,
            6 => SourceTypeCode::FlashFile,
            7 => SourceTypeCode::GameSource,
            8 => SourceTypeCode::Html,
            _ => SourceTypeCode::Undefined,
        }
    }

    /// Parse the host's string form; anything non-numeric is `Undefined`
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map(Self::from_code)
            .unwrap_or(SourceTypeCode::Undefined)
    }

    pub fn code(&self) -> i64 {
        match self {
            SourceTypeCode::Undefined => 0,
            SourceTypeCode::File => 1,
            SourceTypeCode::Live => 2,
            SourceTypeCode::Text => 3,
            SourceTypeCode::Bitmap => 4,
            SourceTypeCode::Screen => 5,
            SourceTypeCode::FlashFile => 6,
            SourceTypeCode::GameSource => 7,
            SourceTypeCode::Html => 8,
        }
    }
}

/// Typed variant a source property bag classifies as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Game,
    VideoPlaylist,
    Html,
    Screen,
    Image,
    Media,
    Camera,
    Audio,
    Flash,
    Generic,
}

/// Classify a raw property bag
///
/// Rules are checked top to bottom and the first match wins. The order is
/// part of the contract: a `.gif` file source is an Image because rule 5
/// runs before the Media rule, and a playlist file is a VideoPlaylist
/// before it can be Html or Media.
pub fn classify(bag: &PropertyBag) -> SourceKind {
    let type_code = SourceTypeCode::parse(bag.get_or_empty("type"));
    let name = bag.get_or_empty("name");
    let item = bag.get_or_empty("item");

    let is_gif = item.ends_with(".gif");
    let is_gif_or_xbs = is_gif || item.ends_with(".xbs");
    let is_stream = item.starts_with("rtsp://") || item.starts_with("rtmp://");

    use SourceTypeCode as T;
    match type_code {
        T::GameSource => SourceKind::Game,
        T::Html | T::File
            if name.starts_with(VIDEO_PLAYLIST_PREFIX)
                && !bag.get_or_empty(PLAYLIST_PROPERTY).is_empty() =>
        {
            SourceKind::VideoPlaylist
        }
        T::Html => SourceKind::Html,
        T::Screen => SourceKind::Screen,
        T::Bitmap => SourceKind::Image,
        T::File if is_gif => SourceKind::Image,
        T::File if !is_gif_or_xbs && !is_stream => SourceKind::Media,
        T::Live if !item.contains(AUDIO_DEVICE_GUID) => SourceKind::Camera,
        T::Live => SourceKind::Audio,
        T::FlashFile => SourceKind::Flash,
        _ => SourceKind::Generic,
    }
}
