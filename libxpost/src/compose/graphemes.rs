//! User-perceived character counting
//!
//! Platforms count an emoji with modifiers or a base letter with combining
//! marks as one character, so counts are taken over extended grapheme
//! clusters rather than bytes or code points.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// How a buffer's length is measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountStrategy {
    /// Extended grapheme clusters (what platforms display)
    #[default]
    Graphemes,
    /// Unicode scalar values; coarser fallback
    CodePoints,
}

impl CountStrategy {
    pub fn count(self, text: &str) -> usize {
        match self {
            CountStrategy::Graphemes => count(text),
            CountStrategy::CodePoints => text.chars().count(),
        }
    }
}

/// Number of user-perceived characters in `text`
pub fn count(text: &str) -> usize {
    text.graphemes(true).count()
}
