//! Sources: the shared objects items render
//!
//! A [`Source`] talks to the host through whichever item currently renders
//! it, rebinding to another linked item when its cached one is gone.
//! [`TypedSource`] is the tagged union produced by classification.

pub mod game;
pub mod kind;
pub mod screen;
pub mod value;

pub use game::GameSource;
pub use kind::{
    classify, SourceKind, SourceTypeCode, AUDIO_DEVICE_GUID, PLAYLIST_PROPERTY,
    VIDEO_PLAYLIST_PREFIX,
};
pub use screen::ScreenSource;
pub use value::{ItemValue, ValueElement};

use crate::binding::{Binding, Bound};
use crate::capabilities::SourceProperties;
use crate::identity::Identity;
use crate::item::Item;
use crate::properties::PropertyBag;
use crate::Result;

/// Properties classification reads, fetched when not already cached
const EVIDENCE_KEYS: &[&str] = &["prop:type", "prop:name", "prop:item"];

#[derive(Debug, Clone)]
pub struct Source {
    binding: Binding,
}

impl Source {
    /// The source rendered by `item`
    ///
    /// Shares the item's source record, so properties already read through
    /// the item are known here without a round trip.
    pub fn from_item(item: &Item) -> Self {
        Self {
            binding: item.binding().with_direct_call(false),
        }
    }

    pub fn source_id(&self) -> &str {
        &self.binding.identity().source_id
    }

    /// The placement this source is currently addressed through
    pub fn identity(&self) -> &Identity {
        self.binding.identity()
    }

    pub fn cached_property(&self, key: &str) -> Option<String> {
        self.binding.cached(key)
    }

    /// Snapshot of the shared property bag
    pub fn properties(&self) -> PropertyBag {
        self.binding.source().properties()
    }

    /// Variant the cached properties classify as
    pub fn kind(&self) -> SourceKind {
        classify(&self.properties())
    }

    /// Read whatever classification needs and is not cached yet
    pub async fn load_classification_evidence(&mut self) -> Result<&mut Self> {
        for key in EVIDENCE_KEYS {
            if self.binding.cached(key).is_none() {
                self.binding.source_get(key).await?;
            }
        }

        let bag = self.properties();
        let type_code = SourceTypeCode::parse(bag.get_or_empty("type"));
        let maybe_playlist = matches!(type_code, SourceTypeCode::Html | SourceTypeCode::File)
            && bag.get_or_empty("name").starts_with(VIDEO_PLAYLIST_PREFIX);
        if maybe_playlist && !bag.contains(PLAYLIST_PROPERTY) {
            self.binding
                .source_get(&format!("prop:{}", PLAYLIST_PROPERTY))
                .await?;
        }
        Ok(self)
    }

    /// Wrap in the variant the cached properties classify as
    pub fn into_typed(self) -> TypedSource {
        match self.kind() {
            SourceKind::Game => TypedSource::Game(GameSource::new(self)),
            SourceKind::VideoPlaylist => TypedSource::VideoPlaylist(self),
            SourceKind::Html => TypedSource::Html(self),
            SourceKind::Screen => TypedSource::Screen(ScreenSource::new(self)),
            SourceKind::Image => TypedSource::Image(self),
            SourceKind::Media => TypedSource::Media(self),
            SourceKind::Camera => TypedSource::Camera(self),
            SourceKind::Audio => TypedSource::Audio(self),
            SourceKind::Flash => TypedSource::Flash(self),
            SourceKind::Generic => TypedSource::Generic(self),
        }
    }
}

impl Bound for Source {
    fn binding(&self) -> &Binding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding {
        &mut self.binding
    }
}

impl SourceProperties for Source {}

/// Two sources are equal when they share a source id
impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        self.source_id() == other.source_id()
    }
}

/// A classified source
///
/// Variants without extra capabilities carry a plain [`Source`].
#[derive(Debug, Clone)]
pub enum TypedSource {
    Game(GameSource),
    VideoPlaylist(Source),
    Html(Source),
    Screen(ScreenSource),
    Image(Source),
    Media(Source),
    Camera(Source),
    Audio(Source),
    Flash(Source),
    Generic(Source),
}

impl TypedSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            TypedSource::Game(_) => SourceKind::Game,
            TypedSource::VideoPlaylist(_) => SourceKind::VideoPlaylist,
            TypedSource::Html(_) => SourceKind::Html,
            TypedSource::Screen(_) => SourceKind::Screen,
            TypedSource::Image(_) => SourceKind::Image,
            TypedSource::Media(_) => SourceKind::Media,
            TypedSource::Camera(_) => SourceKind::Camera,
            TypedSource::Audio(_) => SourceKind::Audio,
            TypedSource::Flash(_) => SourceKind::Flash,
            TypedSource::Generic(_) => SourceKind::Generic,
        }
    }

    pub fn source(&self) -> &Source {
        match self {
            TypedSource::Game(game) => game.source(),
            TypedSource::Screen(screen) => screen.source(),
            TypedSource::VideoPlaylist(source)
            | TypedSource::Html(source)
            | TypedSource::Image(source)
            | TypedSource::Media(source)
            | TypedSource::Camera(source)
            | TypedSource::Audio(source)
            | TypedSource::Flash(source)
            | TypedSource::Generic(source) => source,
        }
    }

    pub fn source_mut(&mut self) -> &mut Source {
        match self {
            TypedSource::Game(game) => game.source_mut(),
            TypedSource::Screen(screen) => screen.source_mut(),
            TypedSource::VideoPlaylist(source)
            | TypedSource::Html(source)
            | TypedSource::Image(source)
            | TypedSource::Media(source)
            | TypedSource::Camera(source)
            | TypedSource::Audio(source)
            | TypedSource::Flash(source)
            | TypedSource::Generic(source) => source,
        }
    }

    pub fn into_source(self) -> Source {
        match self {
            TypedSource::Game(game) => game.into_source(),
            TypedSource::Screen(screen) => screen.into_source(),
            TypedSource::VideoPlaylist(source)
            | TypedSource::Html(source)
            | TypedSource::Image(source)
            | TypedSource::Media(source)
            | TypedSource::Camera(source)
            | TypedSource::Audio(source)
            | TypedSource::Flash(source)
            | TypedSource::Generic(source) => source,
        }
    }

    pub fn source_id(&self) -> &str {
        self.source().source_id()
    }

    pub fn as_game(&mut self) -> Option<&mut GameSource> {
        match self {
            TypedSource::Game(game) => Some(game),
            _ => None,
        }
    }

    pub fn as_screen(&mut self) -> Option<&mut ScreenSource> {
        match self {
            TypedSource::Screen(screen) => Some(screen),
            _ => None,
        }
    }
}
