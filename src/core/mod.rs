//! Core remix logic.
//!
//! This module contains:
//! - Splitter: completion text -> items
//! - Remixer: the single-flight remix invoker
//! - Session: pure state machine for the remix screen
//! - Panel: the saved-content listing
//! - Share: platform share links

pub mod panel;
pub mod remixer;
pub mod session;
pub mod share;
pub mod splitter;

// Re-export commonly used types
pub use panel::SavedPanel;
pub use remixer::{build_prompt, RemixError, Remixer, DEFAULT_TIMEOUT};
pub use session::{update, Effect, Msg, Session};
pub use share::{encode_component, share_action, ShareAction};
pub use splitter::{split_for_platform, split_numbered, SplitInput};
