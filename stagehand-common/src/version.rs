//! Host application version comparison
//!
//! Host versions are dotted numeric strings (`2.9.1608.2701`). Comparison is
//! component-wise; missing trailing components count as zero, so `2.9` and
//! `2.9.0.0` are equal.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// First host version that understands linked sources (`link:`/`s:` call
/// segments on `additem`, `itemlist`, `prop:globalsrc`).
pub const GLOBALSRC_MIN_VERSION: &str = "2.9.1608.2701";

const GLOBALSRC_MIN_COMPONENTS: [u32; 4] = [2, 9, 1608, 2701];

/// Negotiated host application version
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostVersion {
    components: Vec<u32>,
}

impl HostVersion {
    /// Parse a dotted version string
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidVersion("empty version string".to_string()));
        }

        let components = trimmed
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| Error::InvalidVersion(format!("{:?} in {:?}", part, trimmed)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { components })
    }

    /// Minimum version supporting linked sources
    pub fn globalsrc_min() -> Self {
        Self {
            components: GLOBALSRC_MIN_COMPONENTS.to_vec(),
        }
    }

    /// `true` when this version sorts strictly before `other`
    pub fn is_less_than(&self, other: &HostVersion) -> bool {
        self < other
    }

    /// `true` when the host understands linked sources
    pub fn supports_linked_sources(&self) -> bool {
        !self.is_less_than(&Self::globalsrc_min())
    }

    pub fn components(&self) -> &[u32] {
        &self.components
    }

    fn component(&self, index: usize) -> u32 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

impl Ord for HostVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for HostVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HostVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HostVersion {}

impl FromStr for HostVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HostVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<HostVersion> for String {
    fn from(version: HostVersion) -> Self {
        version.to_string()
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}
