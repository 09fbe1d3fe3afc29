//! Mirroring edits across platform buffers
//!
//! An edit to one platform buffer is reduced to its body under the active
//! mode, then re-decorated and written into every other buffer the mode
//! includes. Writes are last-writer-wins: whatever a sibling buffer held is
//! overwritten.
//!
//! Writing a sibling buffer notifies a [`BufferObserver`], and an observer
//! that feeds the write back in as a fresh edit would otherwise bounce
//! between buffers forever. A [`SyncPass`] token is held for the duration of
//! one propagation; any edit that arrives while it is held is suppressed.

use std::cell::Cell;

use super::buffers::PlatformBuffers;
use super::mode::ComposerState;
use crate::types::Platform;

/// Receives a notification after each sibling buffer write
///
/// This is where a rendering layer wires its buffer input events through;
/// [`ComposeService`](crate::service::ComposeService) passes [`NoopObserver`].
pub trait BufferObserver {
    fn buffer_written(&mut self, engine: &SyncEngine, buffers: &mut PlatformBuffers, platform: &Platform);
}

/// Observer that ignores every write
pub struct NoopObserver;

impl BufferObserver for NoopObserver {
    fn buffer_written(&mut self, _: &SyncEngine, _: &mut PlatformBuffers, _: &Platform) {}
}

/// What one call to [`SyncEngine::on_edit`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No mode active, or mirroring disabled
    Skipped,
    /// Arrived while another pass was running
    Suppressed,
    /// Sibling buffers rewritten, in buffer order
    Propagated { targets: Vec<Platform> },
}

/// Token proving a propagation pass is in progress; released on drop
pub struct SyncPass<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for SyncPass<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

#[derive(Debug, Default)]
pub struct SyncEngine {
    in_progress: Cell<bool>,
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pass, or `None` if one is already running
    pub fn begin(&self) -> Option<SyncPass<'_>> {
        if self.in_progress.replace(true) {
            None
        } else {
            Some(SyncPass {
                flag: &self.in_progress,
            })
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.in_progress.get()
    }

    /// Propagate the current text of `source` to its siblings
    pub fn on_edit(
        &self,
        state: &ComposerState,
        buffers: &mut PlatformBuffers,
        source: &Platform,
        observer: &mut dyn BufferObserver,
    ) -> SyncOutcome {
        let Some(mode) = state.active_mode() else {
            return SyncOutcome::Skipped;
        };
        if !state.mirror_enabled() {
            return SyncOutcome::Skipped;
        }

        let Some(_pass) = self.begin() else {
            tracing::trace!(%source, "Edit arrived during sync pass, suppressed");
            return SyncOutcome::Suppressed;
        };

        let body = mode.extract(source, buffers.text(source));

        let targets: Vec<Platform> = buffers
            .platforms()
            .filter(|p| *p != source && mode.includes(p))
            .cloned()
            .collect();

        for target in &targets {
            let text = mode.apply(target, &body);
            if let Some(buffer) = buffers.get_mut(target) {
                buffer.set(text);
            }
            observer.buffer_written(self, buffers, target);
        }

        tracing::debug!(%source, mode = %mode.name, targets = targets.len(), "Mirrored edit");
        SyncOutcome::Propagated { targets }
    }
}
