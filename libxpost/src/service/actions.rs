//! Serialisable input events for a compose session
//!
//! Every user interaction maps to one [`ComposeAction`]; feeding a sequence
//! of them through [`ComposeService::dispatch`](super::ComposeService::dispatch)
//! reproduces a session without a live interface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::draft::DraftRestore;
use crate::compose::QueuedFile;
use crate::types::Platform;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ComposeAction {
    // === Text input ===
    /// A per-platform buffer now holds `text`
    EditPlatform { platform: Platform, text: String },

    /// The shared buffer now holds `text`
    EditShared { text: String },

    // === Mode and selection ===
    /// Pick a mode, or `None` for no mode
    SetMode { mode: Option<String> },

    TogglePlatform { platform: Platform, selected: bool },

    SetMirror { enabled: bool },

    // === Attachments and link card ===
    AddFiles { files: Vec<QueuedFile> },

    RemoveQueued { index: usize },

    RemoveDraft { index: usize },

    SetQueuedAltText { index: usize, alt_text: String },

    SetDraftAltText { index: usize, alt_text: String },

    SetLinkUrl { url: String },

    /// Content warning for one platform; empty text removes it
    SetContentWarning { platform: Platform, text: String },

    // === Session ===
    SetDraft { draft: bool },

    /// Append a mention per platform unless already present
    AppendMentions { mentions: BTreeMap<Platform, String> },

    ComposeEntry(EntryPost),

    RestoreDraft(DraftRestore),

    Clear,
}

/// A pre-filled post for one entry, composed under a mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPost {
    pub mode: String,
    pub body: String,
    #[serde(default)]
    pub link_url: String,
    /// Exact selection for the post, overriding the mode's auto-select
    pub platforms: Vec<Platform>,
}
