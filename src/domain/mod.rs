//! Domain types for remixer.
//!
//! This module contains the core data structures:
//! - Platform: the closed set of remix targets
//! - Remix: requests and platform-shaped results
//! - Saved: persisted rows
//! - Notice: transient user messages

pub mod notice;
pub mod platform;
pub mod remix;
pub mod saved;

// Re-export commonly used types
pub use notice::{Notice, NoticeKind, DEFAULT_NOTICE_DURATION};
pub use platform::{PerPlatform, Platform, UnknownPlatform};
pub use remix::{CharCount, EmptySourceText, RemixRequest, RemixResult};
pub use saved::{NewSavedItem, SavedId, SavedItem};
