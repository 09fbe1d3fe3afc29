//! Editable text buffers
//!
//! While a mode is active every platform has its own buffer; otherwise the
//! single shared buffer stands in for all selected platforms.

use serde::{Deserialize, Serialize};

use crate::types::Platform;

/// Text of one input plus the caret position
///
/// `cursor` is measured in chars from the start of `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buffer {
    pub text: String,
    pub cursor: usize,
}

impl Buffer {
    /// Replace the text, placing the cursor at the end
    pub fn set(&mut self, text: String) {
        self.cursor = text.chars().count();
        self.text = text;
    }

    /// Replace the text, placing the cursor `cursor` chars in
    pub fn set_with_cursor(&mut self, text: String, cursor: usize) {
        self.cursor = cursor.min(text.chars().count());
        self.text = text;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The shared buffer plus one buffer per configured platform, in
/// configuration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformBuffers {
    shared: Buffer,
    platforms: Vec<(Platform, Buffer)>,
}

impl PlatformBuffers {
    pub fn new(platforms: impl IntoIterator<Item = Platform>) -> Self {
        Self {
            shared: Buffer::default(),
            platforms: platforms
                .into_iter()
                .map(|p| (p, Buffer::default()))
                .collect(),
        }
    }

    pub fn shared(&self) -> &Buffer {
        &self.shared
    }

    pub fn shared_mut(&mut self) -> &mut Buffer {
        &mut self.shared
    }

    pub fn get(&self, platform: &Platform) -> Option<&Buffer> {
        self.platforms
            .iter()
            .find(|(p, _)| p == platform)
            .map(|(_, b)| b)
    }

    pub fn get_mut(&mut self, platform: &Platform) -> Option<&mut Buffer> {
        self.platforms
            .iter_mut()
            .find(|(p, _)| p == platform)
            .map(|(_, b)| b)
    }

    /// Text of a platform buffer; empty for unknown platforms
    pub fn text(&self, platform: &Platform) -> &str {
        self.get(platform).map(|b| b.text.as_str()).unwrap_or("")
    }

    pub fn platforms(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter().map(|(p, _)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Platform, &Buffer)> {
        self.platforms.iter().map(|(p, b)| (p, b))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Platform, &mut Buffer)> {
        self.platforms.iter_mut().map(|(p, b)| (&*p, b))
    }

    /// Empty the shared buffer and every platform buffer
    pub fn clear_all(&mut self) {
        self.shared.clear();
        for (_, buffer) in &mut self.platforms {
            buffer.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_moves_cursor_to_end() {
        let mut buffer = Buffer::default();
        buffer.set("h\u{e9}llo".to_string());
        assert_eq!(buffer.cursor, 5);
    }

    #[test]
    fn test_set_with_cursor_clamps() {
        let mut buffer = Buffer::default();
        buffer.set_with_cursor("abc".to_string(), 10);
        assert_eq!(buffer.cursor, 3);
    }

    #[test]
    fn test_buffers_keep_configuration_order() {
        let buffers = PlatformBuffers::new(vec![
            Platform::from("mastodon"),
            Platform::from("bluesky"),
            Platform::from("discord"),
        ]);
        let order: Vec<_> = buffers.platforms().map(Platform::as_str).collect();
        assert_eq!(order, vec!["mastodon", "bluesky", "discord"]);
    }

    #[test]
    fn test_clear_all() {
        let mut buffers = PlatformBuffers::new(vec![Platform::from("mastodon")]);
        buffers.shared_mut().set("shared".to_string());
        buffers
            .get_mut(&Platform::from("mastodon"))
            .unwrap()
            .set("mine".to_string());

        buffers.clear_all();
        assert_eq!(buffers.shared().text, "");
        assert_eq!(buffers.text(&Platform::from("mastodon")), "");
        assert_eq!(buffers.text(&Platform::from("unknown")), "");
    }

    #[test]
    fn test_blank_detection() {
        let mut buffer = Buffer::default();
        buffer.set(" \n\t ".to_string());
        assert!(buffer.is_blank());
        buffer.set(" x ".to_string());
        assert!(!buffer.is_blank());
    }
}
