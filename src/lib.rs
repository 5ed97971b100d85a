//! remixer - rewrite text for social platforms with an LLM
//!
//! Paste some text, pick a platform, and get back a version shaped for
//! it: a numbered thread for Twitter, a single post for LinkedIn, a
//! caption for Instagram. Results can be edited, copied, shared, and
//! saved to a hosted (or local) table.
//!
//! # Modules
//!
//! - `adapters`: Completion endpoints (Anthropic, relay) and desktop glue
//! - `core`: Splitter, remixer, session state machine, share links
//! - `domain`: Data structures (Platform, RemixResult, SavedItem, Notice)
//! - `store`: Saved-content persistence (Supabase, SQLite)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Remix for every platform
//! echo "We shipped v2 today" | remixer remix --all
//!
//! # Save each tweet in the thread
//! remixer remix twitter -i notes.txt --save
//!
//! # Manage saved content
//! remixer saved list
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod store;

// Re-export main types at crate root for convenience
pub use adapters::{AdapterError, CompletionAdapter};
pub use core::{split_numbered, update, Effect, Msg, Remixer, Session, SplitInput};
pub use domain::{Notice, PerPlatform, Platform, RemixRequest, RemixResult, SavedId, SavedItem};
pub use store::{SavedStore, StoreError};
