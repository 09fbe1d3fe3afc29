//! Core types for Xpost

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a target platform (e.g. "mastodon", "bluesky", "discord")
///
/// The set of platforms is configuration, not a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Platform(String);

impl Platform {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Platform {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Platform {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Which platforms are currently checked for posting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformSelection(BTreeMap<Platform, bool>);

impl PlatformSelection {
    /// Selection over `platforms` with every entry unchecked
    pub fn none_of<'a>(platforms: impl IntoIterator<Item = &'a Platform>) -> Self {
        Self(platforms.into_iter().map(|p| (p.clone(), false)).collect())
    }

    pub fn is_selected(&self, platform: &Platform) -> bool {
        self.0.get(platform).copied().unwrap_or(false)
    }

    pub fn set(&mut self, platform: Platform, selected: bool) {
        self.0.insert(platform, selected);
    }

    /// Uncheck every known platform
    pub fn clear(&mut self) {
        for selected in self.0.values_mut() {
            *selected = false;
        }
    }

    pub fn any_selected(&self) -> bool {
        self.0.values().any(|s| *s)
    }

    pub fn selected(&self) -> impl Iterator<Item = &Platform> {
        self.0.iter().filter(|(_, s)| **s).map(|(p, _)| p)
    }
}
