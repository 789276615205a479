//! Scene identity
//!
//! Scenes are created and destroyed by the host; the client only observes
//! which scene an item belongs to. Internally scenes are 0-based indexes,
//! externally 1-based numbers.

use crate::{Error, Result};
use std::fmt;

/// A scene, addressed by its 1-based number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scene {
    index: u32,
}

impl Scene {
    /// Scene from its 1-based number
    pub fn from_number(number: u32) -> Result<Self> {
        if number == 0 {
            return Err(Error::InvalidParameters(
                "scene numbers start at 1".to_string(),
            ));
        }
        Ok(Self { index: number - 1 })
    }

    /// Scene from its 0-based host index
    pub fn from_index(index: u32) -> Self {
        Self { index }
    }

    /// 1-based number callers see
    pub fn number(&self) -> u32 {
        self.index + 1
    }

    /// 0-based index the host uses internally
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene {}", self.number())
    }
}

/// A scene argument as supplied by a caller
///
/// Some operations accept a bare scene number, others require a resolved
/// [`Scene`]; the operation decides which forms it recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneArg {
    Scene(Scene),
    Number(i64),
}

impl SceneArg {
    /// The scene when this argument is a [`Scene`]
    pub fn as_scene(&self) -> Option<Scene> {
        match self {
            SceneArg::Scene(scene) => Some(*scene),
            SceneArg::Number(_) => None,
        }
    }

    /// Resolve either form to a scene, validating bare numbers
    pub fn to_scene(&self) -> Result<Scene> {
        match self {
            SceneArg::Scene(scene) => Ok(*scene),
            SceneArg::Number(n) => u32::try_from(*n)
                .map_err(|_| Error::InvalidParameters(format!("invalid scene number {}", n)))
                .and_then(Scene::from_number),
        }
    }
}

impl From<Scene> for SceneArg {
    fn from(scene: Scene) -> Self {
        SceneArg::Scene(scene)
    }
}

impl From<i64> for SceneArg {
    fn from(n: i64) -> Self {
        SceneArg::Number(n)
    }
}

impl From<u32> for SceneArg {
    fn from(n: u32) -> Self {
        SceneArg::Number(i64::from(n))
    }
}
