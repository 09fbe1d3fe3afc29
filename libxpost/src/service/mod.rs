//! Service layer for Xpost
//!
//! `ComposeService` is the single entry point an interface talks to. It owns
//! one compose session (selection, buffers, attachments, link card, draft
//! flag) and turns each discrete input event into the matching engine calls,
//! recounting and emitting events as it goes.
//!
//! # Example
//!
//! ```no_run
//! use libxpost::service::ComposeService;
//! use libxpost::types::Platform;
//!
//! # fn example() -> libxpost::Result<()> {
//! let mut service = ComposeService::new()?;
//!
//! service.on_mode_changed(Some("11ty"));
//! service.set_mirror(true);
//! service.on_platform_buffer_edited(&Platform::from("mastodon"), "Hello!".to_string());
//!
//! for count in service.counts() {
//!     println!("{}: {}/{}", count.platform, count.count, count.limit);
//! }
//!
//! let submission = service.submit()?;
//! println!("{}", serde_json::to_string_pretty(&submission)?);
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod draft;
pub mod events;
pub mod submit;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use self::actions::{ComposeAction, EntryPost};
pub use self::draft::{DraftImagesPayload, DraftRestore};
pub use self::events::{ComposeEvent, EventBus, EventReceiver};
pub use self::submit::{Submission, SubmissionText};

use crate::compose::{
    counts, preview, AttachmentManager, CharCount, ComposerState, CountStrategy, DraftImage,
    InputLocks, ModeController, NoopObserver, PlatformBuffers, QueuedFile, SyncEngine,
    SyncOutcome, TemplateStore, Transition,
};
use crate::config::Config;
use crate::error::{Result, XpostError};
use crate::types::{Platform, PlatformSelection};

/// Highlighted preview of one platform's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformPreview {
    pub platform: Platform,
    pub html: String,
}

/// One compose session
pub struct ComposeService {
    config: Arc<Config>,
    strategy: CountStrategy,
    limits: Vec<(Platform, usize)>,
    controller: ModeController,
    state: ComposerState,
    buffers: PlatformBuffers,
    attachments: AttachmentManager,
    sync: SyncEngine,
    link_url: String,
    content_warnings: BTreeMap<Platform, String>,
    draft: bool,
    event_bus: EventBus,
}

impl ComposeService {
    /// Create a session from the default configuration file, or the
    /// built-in configuration when there is none
    pub fn new() -> Result<Self> {
        let config = Config::load_or_default()?;
        Self::from_config(config)
    }

    /// Create a session from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a mode includes a platform that is not configured,
    /// or a platform is configured twice.
    pub fn from_config(config: Config) -> Result<Self> {
        let templates = TemplateStore::from_config(&config)?;

        let limits: Vec<(Platform, usize)> = config
            .platforms
            .iter()
            .map(|p| (Platform::from(p.name.as_str()), p.char_limit))
            .collect();
        let platforms: Vec<Platform> = limits.iter().map(|(p, _)| p.clone()).collect();

        let mut selection = PlatformSelection::none_of(&platforms);
        for name in &config.defaults.platforms {
            let platform = Platform::from(name.as_str());
            if platforms.contains(&platform) {
                selection.set(platform, true);
            } else {
                tracing::warn!(platform = %name, "Default platform is not configured, ignoring");
            }
        }

        tracing::debug!(
            platforms = platforms.len(),
            modes = templates.len(),
            "Compose session created"
        );

        Ok(Self {
            strategy: config.defaults.counting,
            draft: config.defaults.draft,
            controller: ModeController::new(templates),
            state: ComposerState::new(selection),
            buffers: PlatformBuffers::new(platforms),
            attachments: AttachmentManager::new(),
            sync: SyncEngine::new(),
            link_url: String::new(),
            content_warnings: BTreeMap::new(),
            event_bus: EventBus::default(),
            limits,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn templates(&self) -> &TemplateStore {
        self.controller.templates()
    }

    pub fn state(&self) -> &ComposerState {
        &self.state
    }

    pub fn buffers(&self) -> &PlatformBuffers {
        &self.buffers
    }

    pub fn attachments(&self) -> &AttachmentManager {
        &self.attachments
    }

    pub fn link_url(&self) -> &str {
        &self.link_url
    }

    pub fn content_warnings(&self) -> &BTreeMap<Platform, String> {
        &self.content_warnings
    }

    pub fn is_draft(&self) -> bool {
        self.draft
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }

    /// Record new text in a platform buffer and mirror it if enabled
    pub fn on_platform_buffer_edited(&mut self, platform: &Platform, text: String) -> SyncOutcome {
        let Some(buffer) = self.buffers.get_mut(platform) else {
            tracing::debug!(%platform, "Edit for unconfigured platform ignored");
            return SyncOutcome::Skipped;
        };
        buffer.set(text);

        let outcome = self
            .sync
            .on_edit(&self.state, &mut self.buffers, platform, &mut NoopObserver);
        if let SyncOutcome::Propagated { targets } = &outcome {
            self.event_bus.emit(ComposeEvent::BuffersSynced {
                source: platform.clone(),
                targets: targets.clone(),
            });
        }
        self.recount();
        outcome
    }

    /// Record new text in the shared buffer
    pub fn on_shared_buffer_edited(&mut self, text: String) {
        self.buffers.shared_mut().set(text);
        self.recount();
    }

    /// `Some(name)` activates a mode, `None` deactivates
    pub fn on_mode_changed(&mut self, mode: Option<&str>) -> Transition {
        let transition = match mode {
            Some(name) => self
                .controller
                .activate(&mut self.state, &mut self.buffers, name, false),
            None => self.controller.deactivate(&mut self.state, &mut self.buffers),
        };
        self.after_transition(&transition);
        transition
    }

    pub fn on_platform_toggled(&mut self, platform: Platform, selected: bool) {
        self.state.set_selected(platform, selected);
        self.recount();
    }

    /// Returns whether mirroring is now on; always false without a mode
    pub fn set_mirror(&mut self, enabled: bool) -> bool {
        self.state.set_mirror(enabled);
        self.state.mirror_enabled()
    }

    /// Queue files up to the remaining capacity
    ///
    /// Returns how many were queued. Nothing is queued while a link card is
    /// set.
    pub fn on_files_added(&mut self, files: Vec<QueuedFile>) -> usize {
        if self.has_link() {
            tracing::warn!(files = files.len(), "Link card is set, images refused");
            return 0;
        }
        let added = self.attachments.add_files(files);
        self.attachments_changed();
        added
    }

    pub fn remove_queued(&mut self, index: usize) -> Option<QueuedFile> {
        let removed = self.attachments.remove_queued(index);
        if removed.is_some() {
            self.attachments_changed();
        }
        removed
    }

    pub fn remove_draft(&mut self, index: usize) -> Option<DraftImage> {
        let removed = self.attachments.remove_draft(index);
        if removed.is_some() {
            self.attachments_changed();
        }
        removed
    }

    pub fn set_queued_alt_text(&mut self, index: usize, alt_text: String) -> bool {
        self.attachments.set_queued_alt_text(index, alt_text)
    }

    pub fn set_draft_alt_text(&mut self, index: usize, alt_text: String) -> bool {
        self.attachments.set_draft_alt_text(index, alt_text)
    }

    /// Set the link card URL
    ///
    /// Refused while images are attached; clearing the URL always succeeds.
    pub fn set_link_url(&mut self, url: String) -> bool {
        if !url.trim().is_empty() && self.attachments.total_count() > 0 {
            tracing::warn!(url = %url, "Images are attached, link card refused");
            return false;
        }
        self.link_url = url;
        self.event_bus.emit(ComposeEvent::LinkChanged {
            url: self.link_url.clone(),
            locks: self.input_locks(),
        });
        true
    }

    /// Set the content warning for one platform; blank text removes it
    ///
    /// Returns false for a platform that is not configured.
    pub fn set_content_warning(&mut self, platform: Platform, text: String) -> bool {
        if self.buffers.get(&platform).is_none() {
            tracing::debug!(%platform, "Content warning for unconfigured platform ignored");
            return false;
        }
        if text.trim().is_empty() {
            self.content_warnings.remove(&platform);
        } else {
            self.content_warnings.insert(platform, text);
        }
        true
    }

    pub fn set_draft(&mut self, draft: bool) {
        self.draft = draft;
    }

    /// Current counters, see [`counts::recompute`]
    pub fn counts(&self) -> Vec<CharCount> {
        counts::recompute(self.strategy, &self.limits, &self.state, &self.buffers)
    }

    pub fn input_locks(&self) -> InputLocks {
        InputLocks::compute(self.attachments.total_count(), &self.link_url)
    }

    /// Highlighted text for each selected platform, in configuration order
    pub fn preview(&self) -> Vec<PlatformPreview> {
        self.buffers
            .platforms()
            .filter(|p| self.state.selection().is_selected(p))
            .map(|platform| {
                let text = if self.state.is_mode_active() {
                    self.buffers.text(platform)
                } else {
                    self.buffers.shared().text.as_str()
                };
                PlatformPreview {
                    platform: platform.clone(),
                    html: preview::highlight(text),
                }
            })
            .collect()
    }

    /// Run the submit gate and, on success, hand back the payload and reset
    /// the session
    ///
    /// # Errors
    ///
    /// Returns [`XpostError::Submission`] naming the first failed check; the
    /// session is left untouched in that case.
    pub fn submit(&mut self) -> Result<Submission> {
        match submit::build(
            &self.state,
            &self.buffers,
            &self.attachments,
            &self.link_url,
            &self.content_warnings,
            self.draft,
        ) {
            Ok(submission) => {
                tracing::info!(
                    session_id = %submission.session_id,
                    draft = submission.draft,
                    platforms = submission.platforms.len(),
                    "Submission ready"
                );
                self.event_bus.emit(ComposeEvent::SubmissionReady {
                    session_id: submission.session_id.to_string(),
                    platforms: submission.platforms.clone(),
                });
                self.clear();
                Ok(submission)
            }
            Err(reason) => {
                tracing::debug!(%reason, "Submission blocked");
                self.event_bus.emit(ComposeEvent::SubmissionBlocked {
                    message: reason.to_string(),
                });
                Err(reason.into())
            }
        }
    }

    /// Reset the session to a blank slate
    pub fn clear(&mut self) {
        let transition = self.controller.deactivate(&mut self.state, &mut self.buffers);
        if let Transition::Deactivated { mode } = transition {
            self.event_bus.emit(ComposeEvent::ModeDeactivated { mode });
        }
        self.buffers.clear_all();
        self.link_url.clear();
        self.content_warnings.clear();
        self.state.clear_selection();
        self.attachments.clear();
        self.draft = self.config.defaults.draft;

        self.event_bus.emit(ComposeEvent::Cleared);
        self.recount();
    }

    /// Append a mention to each listed platform buffer that lacks it
    pub fn append_mentions(&mut self, mentions: &BTreeMap<Platform, String>) {
        for (platform, mention) in mentions {
            let Some(buffer) = self.buffers.get_mut(platform) else {
                tracing::debug!(%platform, "Mention for unconfigured platform ignored");
                continue;
            };
            if mention.is_empty() || buffer.text.contains(mention.as_str()) {
                continue;
            }
            let text = format!("{} {}", buffer.text.trim_end(), mention);
            buffer.set(text);
        }
        self.recount();
    }

    /// Fill the session from an entry post under its mode
    ///
    /// # Errors
    ///
    /// Returns [`XpostError::InvalidInput`] if the mode is unknown.
    pub fn compose_entry(&mut self, entry: EntryPost) -> Result<()> {
        let template = self
            .controller
            .templates()
            .get(&entry.mode)
            .ok_or_else(|| XpostError::InvalidInput(format!("Unknown mode: {}", entry.mode)))?;

        self.state.clear_selection();
        for platform in &entry.platforms {
            self.state.set_selected(platform.clone(), true);
        }

        let transition =
            self.controller
                .activate(&mut self.state, &mut self.buffers, &entry.mode, true);
        self.after_transition(&transition);

        // Activation auto-selects the mode's platforms
        self.state.clear_selection();
        for platform in entry.platforms {
            self.state.set_selected(platform, true);
        }

        for (platform, buffer) in self.buffers.iter_mut() {
            let cursor = template.prefix(platform).chars().count() + entry.body.chars().count();
            buffer.set_with_cursor(template.apply(platform, &entry.body), cursor);
        }

        if !entry.link_url.is_empty() {
            self.set_link_url(entry.link_url);
        }
        self.recount();
        Ok(())
    }

    /// Put a saved draft back on screen
    ///
    /// Buffers are filled with the saved text before the mode is activated,
    /// and activation leaves them as they are. Images win over a link card,
    /// whether the link came with the draft or was set before it.
    pub fn restore_draft(&mut self, restore: DraftRestore) {
        self.buffers.shared_mut().set(restore.shared_text);
        for (platform, text) in restore.platform_texts {
            match self.buffers.get_mut(&platform) {
                Some(buffer) => buffer.set(text),
                None => tracing::warn!(%platform, "Draft text for unconfigured platform dropped"),
            }
        }

        self.state.clear_selection();
        for platform in restore.platforms {
            self.state.set_selected(platform, true);
        }

        if let Some(mode) = restore.mode.as_deref() {
            let transition = self
                .controller
                .activate(&mut self.state, &mut self.buffers, mode, true);
            self.after_transition(&transition);
        }

        self.content_warnings.clear();
        for (platform, text) in restore.content_warnings {
            self.set_content_warning(platform, text);
        }

        if let Some(payload) = restore.images {
            let images = payload.into_images(&self.config.attachments.draft_image_base);
            if !images.is_empty() && self.has_link() {
                tracing::warn!(url = %self.link_url, "Draft images replace the link card");
                self.set_link_url(String::new());
            }
            self.attachments.restore_drafts(images);
            self.attachments_changed();
        }

        if !restore.link_url.is_empty() && !self.set_link_url(restore.link_url) {
            tracing::warn!("Draft carried both images and a link card, link dropped");
        }
        self.recount();
    }

    /// Apply one serialised input event
    ///
    /// # Errors
    ///
    /// Only [`ComposeAction::ComposeEntry`] can fail, on an unknown mode.
    pub fn dispatch(&mut self, action: ComposeAction) -> Result<()> {
        tracing::trace!(?action, "Dispatching");
        match action {
            ComposeAction::EditPlatform { platform, text } => {
                self.on_platform_buffer_edited(&platform, text);
            }
            ComposeAction::EditShared { text } => self.on_shared_buffer_edited(text),
            ComposeAction::SetMode { mode } => {
                self.on_mode_changed(mode.as_deref());
            }
            ComposeAction::TogglePlatform { platform, selected } => {
                self.on_platform_toggled(platform, selected)
            }
            ComposeAction::SetMirror { enabled } => {
                self.set_mirror(enabled);
            }
            ComposeAction::AddFiles { files } => {
                self.on_files_added(files);
            }
            ComposeAction::RemoveQueued { index } => {
                self.remove_queued(index);
            }
            ComposeAction::RemoveDraft { index } => {
                self.remove_draft(index);
            }
            ComposeAction::SetQueuedAltText { index, alt_text } => {
                self.set_queued_alt_text(index, alt_text);
            }
            ComposeAction::SetDraftAltText { index, alt_text } => {
                self.set_draft_alt_text(index, alt_text);
            }
            ComposeAction::SetLinkUrl { url } => {
                self.set_link_url(url);
            }
            ComposeAction::SetContentWarning { platform, text } => {
                self.set_content_warning(platform, text);
            }
            ComposeAction::SetDraft { draft } => self.set_draft(draft),
            ComposeAction::AppendMentions { mentions } => self.append_mentions(&mentions),
            ComposeAction::ComposeEntry(entry) => self.compose_entry(entry)?,
            ComposeAction::RestoreDraft(restore) => self.restore_draft(restore),
            ComposeAction::Clear => self.clear(),
        }
        Ok(())
    }

    fn has_link(&self) -> bool {
        !self.link_url.trim().is_empty()
    }

    fn after_transition(&mut self, transition: &Transition) {
        match transition {
            Transition::Activated { mode, previous } => {
                self.event_bus.emit(ComposeEvent::ModeActivated {
                    mode: mode.clone(),
                    previous: previous.clone(),
                });
            }
            Transition::Deactivated { mode } => {
                self.event_bus
                    .emit(ComposeEvent::ModeDeactivated { mode: mode.clone() });
            }
            Transition::Unchanged => return,
        }
        self.recount();
    }

    fn attachments_changed(&self) {
        self.event_bus.emit(ComposeEvent::AttachmentsChanged {
            total: self.attachments.total_count(),
            locks: self.input_locks(),
        });
    }

    fn recount(&self) {
        if self.event_bus.subscriber_count() == 0 {
            return;
        }
        self.event_bus.emit(ComposeEvent::CountsUpdated {
            counts: self.counts(),
        });
    }
}
