//! Image attachments and the link-card exclusivity rule
//!
//! A post carries at most [`MAX_ATTACHMENTS`] images, counting both freshly
//! queued files and images already persisted with a draft. Images and a
//! link card never coexist: while one is present the other input is locked.

use serde::{Deserialize, Serialize};

/// Combined cap on queued files plus draft images
pub const MAX_ATTACHMENTS: usize = 4;

/// A newly chosen file waiting to be submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedFile {
    pub name: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    #[serde(default)]
    pub alt_text: String,
}

impl QueuedFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
            alt_text: String::new(),
        }
    }
}

/// An image already stored alongside a saved draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftImage {
    pub draft_id: String,
    pub filename: String,
    pub alt_text: String,
    pub url: String,
}

/// What gets sent back for a draft image on submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftImageRef {
    pub draft_id: String,
    pub filename: String,
    pub alt_text: String,
}

impl From<&DraftImage> for DraftImageRef {
    fn from(image: &DraftImage) -> Self {
        Self {
            draft_id: image.draft_id.clone(),
            filename: image.filename.clone(),
            alt_text: image.alt_text.clone(),
        }
    }
}

/// Queued files and draft images for one compose session
///
/// `queued_files.len() + draft_images.len() <= MAX_ATTACHMENTS` holds after
/// every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentSet {
    queued_files: Vec<QueuedFile>,
    draft_images: Vec<DraftImage>,
}

impl AttachmentSet {
    pub fn queued_files(&self) -> &[QueuedFile] {
        &self.queued_files
    }

    pub fn draft_images(&self) -> &[DraftImage] {
        &self.draft_images
    }

    pub fn total_count(&self) -> usize {
        self.queued_files.len() + self.draft_images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}

/// Operations over an [`AttachmentSet`]
#[derive(Debug, Clone, Default)]
pub struct AttachmentManager {
    set: AttachmentSet,
}

impl AttachmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) -> &AttachmentSet {
        &self.set
    }

    pub fn total_count(&self) -> usize {
        self.set.total_count()
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_ATTACHMENTS.saturating_sub(self.total_count())
    }

    pub fn is_full(&self) -> bool {
        self.remaining_capacity() == 0
    }

    /// Queue as many candidates as fit; the rest are dropped
    ///
    /// Returns how many were queued.
    pub fn add_files(&mut self, candidates: impl IntoIterator<Item = QueuedFile>) -> usize {
        let capacity = self.remaining_capacity();
        let mut added = 0;
        let mut dropped = 0;
        for candidate in candidates {
            if added < capacity {
                self.set.queued_files.push(candidate);
                added += 1;
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::debug!(added, dropped, "Attachment cap reached, extra files dropped");
        }
        added
    }

    /// Replace the draft images, keeping only as many as fit
    pub fn restore_drafts(&mut self, images: Vec<DraftImage>) -> usize {
        let capacity = MAX_ATTACHMENTS.saturating_sub(self.set.queued_files.len());
        let offered = images.len();
        self.set.draft_images = images.into_iter().take(capacity).collect();
        if offered > self.set.draft_images.len() {
            tracing::warn!(
                offered,
                kept = self.set.draft_images.len(),
                "Draft carried more images than allowed, extra images dropped"
            );
        }
        self.set.draft_images.len()
    }

    pub fn remove_queued(&mut self, index: usize) -> Option<QueuedFile> {
        (index < self.set.queued_files.len()).then(|| self.set.queued_files.remove(index))
    }

    pub fn remove_draft(&mut self, index: usize) -> Option<DraftImage> {
        (index < self.set.draft_images.len()).then(|| self.set.draft_images.remove(index))
    }

    pub fn set_queued_alt_text(&mut self, index: usize, alt_text: String) -> bool {
        match self.set.queued_files.get_mut(index) {
            Some(file) => {
                file.alt_text = alt_text;
                true
            }
            None => false,
        }
    }

    pub fn set_draft_alt_text(&mut self, index: usize, alt_text: String) -> bool {
        match self.set.draft_images.get_mut(index) {
            Some(image) => {
                image.alt_text = alt_text;
                true
            }
            None => false,
        }
    }

    /// True if any draft image or queued file lacks alt text
    pub fn missing_alt_text(&self) -> bool {
        self.set
            .draft_images
            .iter()
            .map(|d| d.alt_text.as_str())
            .chain(self.set.queued_files.iter().map(|q| q.alt_text.as_str()))
            .any(|alt| alt.trim().is_empty())
    }

    pub fn draft_refs(&self) -> Vec<DraftImageRef> {
        self.set.draft_images.iter().map(DraftImageRef::from).collect()
    }

    pub fn clear(&mut self) {
        self.set = AttachmentSet::default();
    }
}

/// Which input groups the interface must disable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLocks {
    /// Images are attached, so no link card
    pub link_disabled: bool,
    /// A link is set or the cap is reached, so no more images
    pub images_disabled: bool,
}

impl InputLocks {
    pub fn compute(attachment_count: usize, link_url: &str) -> Self {
        let has_link = !link_url.trim().is_empty();
        Self {
            link_disabled: attachment_count > 0,
            images_disabled: has_link || attachment_count >= MAX_ATTACHMENTS,
        }
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> QueuedFile {
        QueuedFile::new(name, name.as_bytes().to_vec())
    }

    fn draft(filename: &str, alt: &str) -> DraftImage {
        DraftImage {
            draft_id: "d1".to_string(),
            filename: filename.to_string(),
            alt_text: alt.to_string(),
            url: format!("/draft-image/d1/{}", filename),
        }
    }

    #[test]
    fn test_add_five_keeps_four() {
        let mut manager = AttachmentManager::new();
        let added = manager.add_files((1..=5).map(|i| file(&format!("{}.png", i))));

        assert_eq!(added, 4);
        assert_eq!(manager.total_count(), 4);
        assert_eq!(manager.set().queued_files()[3].name, "4.png");
        assert!(manager.is_full());
    }

    #[test]
    fn test_cap_counts_draft_images() {
        let mut manager = AttachmentManager::new();
        manager.restore_drafts(vec![draft("a.png", "A"), draft("b.png", "B"), draft("c.png", "C")]);

        assert_eq!(manager.add_files(vec![file("x"), file("y")]), 1);
        assert_eq!(manager.total_count(), 4);
        assert_eq!(manager.add_files(vec![file("z")]), 0);
    }

    #[test]
    fn test_cap_holds_across_repeated_calls() {
        let mut manager = AttachmentManager::new();
        for _ in 0..10 {
            manager.add_files(vec![file("a"), file("b"), file("c")]);
            assert!(manager.total_count() <= MAX_ATTACHMENTS);
        }
    }

    #[test]
    fn test_restore_drafts_truncates() {
        let mut manager = AttachmentManager::new();
        let kept = manager.restore_drafts((0..6).map(|i| draft(&format!("{}.jpg", i), "x")).collect());
        assert_eq!(kept, 4);
        assert_eq!(manager.total_count(), 4);
    }

    #[test]
    fn test_remove_by_index() {
        let mut manager = AttachmentManager::new();
        manager.add_files(vec![file("a"), file("b"), file("c")]);
        manager.restore_drafts(vec![draft("d.png", "D")]);

        assert_eq!(manager.remove_queued(1).unwrap().name, "b");
        assert!(manager.remove_queued(5).is_none());
        assert_eq!(manager.remove_draft(0).unwrap().filename, "d.png");
        assert!(manager.remove_draft(0).is_none());
        assert_eq!(manager.total_count(), 2);
        assert_eq!(manager.remaining_capacity(), 2);
    }

    #[test]
    fn test_missing_alt_text() {
        let mut manager = AttachmentManager::new();
        assert!(!manager.missing_alt_text());

        manager.restore_drafts(vec![draft("d.png", "a cat")]);
        manager.add_files(vec![file("new.png")]);
        assert!(manager.missing_alt_text());

        assert!(manager.set_queued_alt_text(0, "  ".to_string()));
        assert!(manager.missing_alt_text());

        assert!(manager.set_queued_alt_text(0, "a dog".to_string()));
        assert!(!manager.missing_alt_text());

        assert!(manager.set_draft_alt_text(0, String::new()));
        assert!(manager.missing_alt_text());
        assert!(!manager.set_draft_alt_text(3, "nope".to_string()));
    }

    #[test]
    fn test_draft_refs_omit_url() {
        let mut manager = AttachmentManager::new();
        manager.restore_drafts(vec![draft("d.png", "alt")]);

        let json = serde_json::to_value(manager.draft_refs()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"draft_id": "d1", "filename": "d.png", "alt_text": "alt"}])
        );
    }

    #[test]
    fn test_queued_file_data_is_base64_in_json() {
        let queued = QueuedFile::new("hello.txt", b"hello".to_vec());
        let json = serde_json::to_value(&queued).unwrap();
        assert_eq!(json["data"], "aGVsbG8=");

        let back: QueuedFile =
            serde_json::from_str(r#"{"name": "hello.txt", "data": "aGVsbG8="}"#).unwrap();
        assert_eq!(back.data, b"hello");
        assert_eq!(back.alt_text, "");
    }

    #[test]
    fn test_input_locks() {
        assert_eq!(InputLocks::compute(0, ""), InputLocks::default());
        assert_eq!(
            InputLocks::compute(1, ""),
            InputLocks {
                link_disabled: true,
                images_disabled: false
            }
        );
        assert_eq!(
            InputLocks::compute(0, "https://example.com"),
            InputLocks {
                link_disabled: false,
                images_disabled: true
            }
        );
        assert!(InputLocks::compute(4, "").images_disabled);
        assert!(!InputLocks::compute(0, "   ").images_disabled);
    }

    #[test]
    fn test_clear() {
        let mut manager = AttachmentManager::new();
        manager.add_files(vec![file("a")]);
        manager.restore_drafts(vec![draft("d.png", "D")]);
        manager.clear();
        assert!(manager.set().is_empty());
    }
}
