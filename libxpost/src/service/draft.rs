//! Restoring a saved draft into a compose session
//!
//! A draft arrives as already-decorated buffer text plus, optionally, the
//! images that were stored with it. Nothing here touches storage; the caller
//! hands over whatever it loaded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::compose::DraftImage;
use crate::error::Result;
use crate::types::Platform;

/// Image list persisted with a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftImagesPayload {
    pub draft_id: String,
    #[serde(default)]
    pub images: Vec<DraftImageEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftImageEntry {
    pub filename: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

impl DraftImagesPayload {
    /// Parse a payload from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the image list from a bare JSON array of entries, as stored
    /// separately from the draft id
    pub fn from_parts(draft_id: impl Into<String>, images_json: &str) -> Result<Self> {
        Ok(Self {
            draft_id: draft_id.into(),
            images: serde_json::from_str(images_json)?,
        })
    }

    /// Resolve each entry to a [`DraftImage`] served under `base`
    pub fn into_images(self, base: &str) -> Vec<DraftImage> {
        let draft_id = self.draft_id;
        self.images
            .into_iter()
            .map(|entry| DraftImage {
                url: draft_image_url(base, &draft_id, &entry.filename),
                draft_id: draft_id.clone(),
                filename: entry.filename,
                alt_text: entry.alt_text.unwrap_or_default(),
            })
            .collect()
    }
}

/// `<base>/<draft_id>/<filename>`
pub fn draft_image_url(base: &str, draft_id: &str, filename: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), draft_id, filename)
}

/// Everything needed to put a saved draft back on screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRestore {
    /// Mode the draft was composed in; activated without resetting buffers
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub shared_text: String,
    /// Decorated per-platform text
    #[serde(default)]
    pub platform_texts: BTreeMap<Platform, String>,
    /// Platforms checked when the draft was saved
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub link_url: String,
    #[serde(default)]
    pub content_warnings: BTreeMap<Platform, String>,
    #[serde(default)]
    pub images: Option<DraftImagesPayload>,
}
