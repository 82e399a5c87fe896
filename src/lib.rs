//! claude-recap: reconstruct and view the active conversation in Claude
//! Code session logs.
//!
//! Claude Code appends one JSON record per line to a session transcript.
//! The records form a parent-keyed forest rather than a list: rewritten
//! prompts create real branches, tool execution creates mechanical forks,
//! and context compaction severs the parent chain behind a synthetic
//! summary root. This crate picks one canonical path through that forest
//! and renders it.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use claude_recap::extract::{group_into_turns, TurnOptions};
//! use claude_recap::session::Session;
//!
//! fn main() -> claude_recap::Result<()> {
//!     let session = Session::load("session.jsonl")?;
//!     let path = session.active_path();
//!     for turn in group_into_turns(&path, &TurnOptions::default()) {
//!         println!("> {}", turn.user_text);
//!         println!("{}", turn.assistant_text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`model`]: tolerant data model for entries and content blocks
//! - [`session`]: transcript store, active-path selection, branch points
//! - [`extract`]: turn grouping and raw sub-block extraction
//! - [`format`]: terminal and JSON rendering
//! - [`discovery`]: project directory resolution
//! - [`index`]: session resolution and sidecar metadata
//! - [`cli`]: command-line interface
//! - [`config`]: display defaults
//! - [`error`]: error types and exit codes

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod format;
pub mod index;
pub mod model;
pub mod session;
pub mod util;

pub use error::{RecapError, Result};
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{RecapError, Result};
    pub use crate::extract::{
        extract_raw_messages, group_into_turns, RawMessage, Turn, TurnMode, TurnOptions,
    };
    pub use crate::model::{ContentBlock, Entry, EntryKind};
    pub use crate::session::{BranchInfo, PathOptions, Session};
}
