//! Per-platform character counters

use serde::{Deserialize, Serialize};

use super::buffers::PlatformBuffers;
use super::graphemes::CountStrategy;
use super::mode::ComposerState;
use crate::types::Platform;

/// One counter as shown next to a buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharCount {
    pub platform: Platform,
    pub count: usize,
    pub limit: usize,
    /// Display only; never blocks submission
    pub over_limit: bool,
}

impl CharCount {
    pub fn new(platform: Platform, count: usize, limit: usize) -> Self {
        Self {
            platform,
            count,
            limit,
            over_limit: count > limit,
        }
    }
}

/// Recompute every visible counter
///
/// With a mode active there is one counter per platform buffer. Without one,
/// each selected platform counts the shared buffer. `limits` is in
/// configuration order and fixes the order of the result.
pub fn recompute(
    strategy: CountStrategy,
    limits: &[(Platform, usize)],
    state: &ComposerState,
    buffers: &PlatformBuffers,
) -> Vec<CharCount> {
    if state.is_mode_active() {
        limits
            .iter()
            .filter(|(platform, _)| buffers.get(platform).is_some())
            .map(|(platform, limit)| {
                CharCount::new(platform.clone(), strategy.count(buffers.text(platform)), *limit)
            })
            .collect()
    } else {
        let shared = strategy.count(&buffers.shared().text);
        limits
            .iter()
            .filter(|(platform, _)| state.selection().is_selected(platform))
            .map(|(platform, limit)| CharCount::new(platform.clone(), shared, *limit))
            .collect()
    }
}
