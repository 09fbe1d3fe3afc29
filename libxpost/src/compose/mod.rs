//! The compose engine: templates, buffers, mirroring, mode switching,
//! counting and attachments

pub mod attachments;
pub mod buffers;
pub mod counts;
pub mod graphemes;
pub mod mode;
pub mod preview;
pub mod sync;
pub mod template;

pub use attachments::{
    AttachmentManager, AttachmentSet, DraftImage, DraftImageRef, InputLocks, QueuedFile,
    MAX_ATTACHMENTS,
};
pub use buffers::{Buffer, PlatformBuffers};
pub use counts::CharCount;
pub use graphemes::CountStrategy;
pub use mode::{ComposerState, ModeController, Transition};
pub use preview::Segment;
pub use sync::{BufferObserver, NoopObserver, SyncEngine, SyncOutcome};
pub use template::{apply_template, extract_body, ModeTemplate, TemplateStore};
