//! Mode activation state machine
//!
//! `Inactive -> Active(mode)` snapshots the platform selection, auto-selects
//! the mode's platforms and resets every platform buffer to its bare
//! decoration. `Active(a) -> Active(b)` keeps the first snapshot and re-wraps
//! each buffer's body under the new mode. `Active -> Inactive` restores the
//! snapshot and empties every buffer.

use std::sync::Arc;

use super::buffers::PlatformBuffers;
use super::template::{ModeTemplate, TemplateStore};
use crate::types::{Platform, PlatformSelection};

/// Per-session compose state
///
/// The saved selection is present exactly while a mode is active; the fields
/// are private so only [`ModeController`] can move between the two.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposerState {
    active_mode: Option<Arc<ModeTemplate>>,
    mirror_enabled: bool,
    saved_selection: Option<PlatformSelection>,
    selection: PlatformSelection,
}

impl ComposerState {
    pub fn new(selection: PlatformSelection) -> Self {
        Self {
            selection,
            ..Self::default()
        }
    }

    pub fn active_mode(&self) -> Option<&ModeTemplate> {
        self.active_mode.as_deref()
    }

    pub fn is_mode_active(&self) -> bool {
        self.active_mode.is_some()
    }

    pub fn mirror_enabled(&self) -> bool {
        self.mirror_enabled
    }

    /// Turn mirroring on or off; has no effect without an active mode
    pub fn set_mirror(&mut self, enabled: bool) {
        self.mirror_enabled = enabled && self.active_mode.is_some();
    }

    pub fn selection(&self) -> &PlatformSelection {
        &self.selection
    }

    pub fn saved_selection(&self) -> Option<&PlatformSelection> {
        self.saved_selection.as_ref()
    }

    /// Toggle a platform checkbox. Modes never lock selection.
    pub fn set_selected(&mut self, platform: Platform, selected: bool) {
        self.selection.set(platform, selected);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

/// Result of a mode transition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Activated {
        mode: String,
        previous: Option<String>,
    },
    Deactivated {
        mode: String,
    },
    Unchanged,
}

/// Drives [`ComposerState`] between `Inactive` and `Active(mode)`
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    templates: TemplateStore,
}

impl ModeController {
    pub fn new(templates: TemplateStore) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Activate the mode called `name`
    ///
    /// With `skip_buffer_reset` the buffers are left alone; this is the path
    /// for restoring a draft whose buffers are already decorated. Unknown
    /// names leave everything untouched.
    pub fn activate(
        &self,
        state: &mut ComposerState,
        buffers: &mut PlatformBuffers,
        name: &str,
        skip_buffer_reset: bool,
    ) -> Transition {
        let Some(template) = self.templates.get(name) else {
            tracing::debug!(mode = name, "Unknown mode, ignoring activation");
            return Transition::Unchanged;
        };

        let previous = state.active_mode.take();
        if previous.is_none() {
            state.saved_selection = Some(state.selection.clone());
        }

        for platform in &template.platforms {
            state.selection.set(platform.clone(), true);
        }
        state.mirror_enabled = false;

        if !skip_buffer_reset {
            match &previous {
                Some(old) => rewrap_buffers(buffers, old, &template),
                None => reset_buffers(buffers, &template),
            }
        }

        tracing::info!(
            mode = %template.name,
            previous = previous.as_ref().map(|m| m.name.as_str()),
            skip_buffer_reset,
            "Mode activated"
        );

        let transition = Transition::Activated {
            mode: template.name.clone(),
            previous: previous.map(|m| m.name.clone()),
        };
        state.active_mode = Some(template);
        transition
    }

    /// Return to `Inactive`, restoring the selection snapshot and emptying
    /// every buffer. No-op when already inactive.
    pub fn deactivate(&self, state: &mut ComposerState, buffers: &mut PlatformBuffers) -> Transition {
        let Some(mode) = state.active_mode.take() else {
            return Transition::Unchanged;
        };

        if let Some(saved) = state.saved_selection.take() {
            state.selection = saved;
        }
        state.mirror_enabled = false;
        buffers.clear_all();

        tracing::info!(mode = %mode.name, "Mode deactivated");
        Transition::Deactivated {
            mode: mode.name.clone(),
        }
    }
}

fn reset_buffers(buffers: &mut PlatformBuffers, template: &ModeTemplate) {
    for (platform, buffer) in buffers.iter_mut() {
        let prefix = template.prefix(platform);
        let text = template.apply(platform, "");
        buffer.set_with_cursor(text, prefix.chars().count());
    }
}

fn rewrap_buffers(buffers: &mut PlatformBuffers, old: &ModeTemplate, new: &ModeTemplate) {
    for (platform, buffer) in buffers.iter_mut() {
        let body = old.extract(platform, &buffer.text);
        let cursor = new.prefix(platform).chars().count() + body.chars().count();
        buffer.set_with_cursor(new.apply(platform, &body), cursor);
    }
}
