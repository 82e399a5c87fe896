//! Data model for Claude Code JSONL session logs.
//!
//! This module provides the typed view of transcript records that the rest
//! of the crate consumes. Parsing is deliberately tolerant: unknown entry
//! types, unknown content block kinds, and non-object list elements are all
//! accepted and carried as `Other`/`Unknown` values rather than rejected,
//! because transcripts are written incrementally by a moving-target producer.

pub mod content;
pub mod entry;

pub use content::*;
pub use entry::*;

use indexmap::IndexMap;
use serde_json::Value;

/// Raw JSON value map that preserves unrecognized top-level fields.
///
/// Keeps entries round-trippable even when newer Claude Code versions add
/// fields this crate does not know about.
pub type UnknownFields = IndexMap<String, Value>;
