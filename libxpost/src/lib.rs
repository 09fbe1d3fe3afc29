//! Xpost - multi-platform compose engine
//!
//! This library keeps per-platform variants of one post in step while the
//! user writes it: mode templates decorate a shared body for each platform,
//! edits are mirrored between buffers, counts are taken in user-perceived
//! characters, and attachments are checked before anything is submitted.

pub mod compose;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use compose::{CharCount, ComposerState, ModeTemplate, TemplateStore};
pub use config::Config;
pub use error::{ConfigError, Result, SubmitError, XpostError};
pub use service::{ComposeAction, ComposeService, Submission};
pub use types::{Platform, PlatformSelection};
