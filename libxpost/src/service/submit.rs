//! Submit-time validation and the payload handed to the transport
//!
//! The gate checks, in order: a platform is selected (unless saving a
//! draft), there is text to send, and every image carries alt text. The
//! first failing check decides the message. Over-limit counts are shown to
//! the user but never block.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compose::{AttachmentManager, ComposerState, DraftImageRef, PlatformBuffers, QueuedFile};
use crate::error::SubmitError;
use crate::types::Platform;

/// Final text, either one shared body or decorated text per platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SubmissionText {
    Shared(String),
    PerPlatform(BTreeMap<Platform, String>),
}

/// Everything a transport needs to publish or store the post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub session_id: Uuid,
    pub composed_at: DateTime<Utc>,
    pub draft: bool,
    pub mode: Option<String>,
    pub platforms: Vec<Platform>,
    pub text: SubmissionText,
    pub link_url: Option<String>,
    /// Trimmed warning per selected platform that has one
    #[serde(default)]
    pub content_warnings: BTreeMap<Platform, String>,
    pub queued_files: Vec<QueuedFile>,
    pub draft_images: Vec<DraftImageRef>,
}

/// Run the gate against the current session
pub fn validate(
    state: &ComposerState,
    buffers: &PlatformBuffers,
    attachments: &AttachmentManager,
    draft: bool,
) -> Result<(), SubmitError> {
    if !draft && !state.selection().any_selected() {
        return Err(SubmitError::NoPlatformSelected);
    }

    if state.is_mode_active() {
        let targets = text_targets(state, buffers);
        if targets.iter().all(|p| buffers.get(p).map_or(true, |b| b.is_blank())) {
            return Err(SubmitError::EmptyPlatformText);
        }
    } else if buffers.shared().is_blank() {
        return Err(SubmitError::EmptyText);
    }

    if attachments.missing_alt_text() {
        return Err(SubmitError::MissingAltText);
    }

    Ok(())
}

/// Validate, then assemble the payload
pub fn build(
    state: &ComposerState,
    buffers: &PlatformBuffers,
    attachments: &AttachmentManager,
    link_url: &str,
    content_warnings: &BTreeMap<Platform, String>,
    draft: bool,
) -> Result<Submission, SubmitError> {
    validate(state, buffers, attachments, draft)?;

    let text = if state.is_mode_active() {
        SubmissionText::PerPlatform(
            text_targets(state, buffers)
                .into_iter()
                .map(|p| {
                    let text = buffers.text(&p).to_string();
                    (p, text)
                })
                .collect(),
        )
    } else {
        SubmissionText::Shared(buffers.shared().text.clone())
    };

    let content_warnings = content_warnings
        .iter()
        .filter(|(p, _)| state.selection().is_selected(p))
        .map(|(p, text)| (p.clone(), text.trim()))
        .filter(|(_, text)| !text.is_empty())
        .map(|(p, text)| (p, text.to_string()))
        .collect();

    let link_url = link_url.trim();
    Ok(Submission {
        session_id: Uuid::new_v4(),
        composed_at: Utc::now(),
        draft,
        mode: state.active_mode().map(|m| m.name.clone()),
        platforms: state.selection().selected().cloned().collect(),
        text,
        link_url: (!link_url.is_empty()).then(|| link_url.to_string()),
        content_warnings,
        queued_files: attachments.set().queued_files().to_vec(),
        draft_images: attachments.draft_refs(),
    })
}

/// Buffers whose text is submitted while a mode is active: the selected
/// platforms, or every buffer for a draft with nothing selected
fn text_targets(state: &ComposerState, buffers: &PlatformBuffers) -> Vec<Platform> {
    let selected: Vec<Platform> = buffers
        .platforms()
        .filter(|p| state.selection().is_selected(p))
        .cloned()
        .collect();
    if selected.is_empty() {
        buffers.platforms().cloned().collect()
    } else {
        selected
    }
}
