//! Session log store: ordered entries plus lookup maps.
//!
//! A [`Session`] owns everything parsed from one JSONL transcript file:
//! the entries in file order, a uuid index, the parent-to-children map,
//! and the logical-parent links that survive compaction. The store is
//! built once by [`Session::load`] and is immutable afterwards, so shared
//! read access across threads is safe.
//!
//! Transcripts are written incrementally and may end mid-line, so loading
//! is lenient: blank lines, lines that fail JSON parsing, and non-object
//! top-level values are skipped without failing the load.

mod branches;
mod path;

pub use branches::{BranchChild, BranchInfo};
pub use path::PathOptions;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RecapError, Result};
use crate::model::{Entry, EntryKind};

/// A loaded transcript with its derived lookup structures.
#[derive(Debug)]
pub struct Session {
    /// Path to the JSONL file.
    path: PathBuf,
    /// Session ID (filename without extension).
    session_id: String,
    /// All entries in file order.
    entries: Vec<Entry>,
    /// uuid -> position of the first entry carrying that uuid.
    by_uuid: HashMap<String, usize>,
    /// parent uuid -> child uuids, in file order.
    children: HashMap<String, Vec<String>>,
    /// uuid -> logicalParentUuid, for entries that carry a non-self link.
    logical_parents: HashMap<String, String>,
}

impl Session {
    /// Load a session from a JSONL transcript file.
    ///
    /// Individual malformed lines are skipped; a missing file fails with
    /// [`RecapError::NotFound`] and unreadable bytes with [`RecapError::Io`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RecapError::NotFound { path: path.clone() }
            } else {
                RecapError::io(format!("Failed to open {}", path.display()), e)
            }
        })?;

        let session_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let mut session = Self {
            path,
            session_id,
            entries: Vec::new(),
            by_uuid: HashMap::new(),
            children: HashMap::new(),
            logical_parents: HashMap::new(),
        };

        let reader = BufReader::new(file);
        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(|e| {
                RecapError::io(format!("Failed to read line {}", line_num + 1), e)
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Entry>(trimmed) {
                Ok(entry) => session.push(entry),
                Err(e) => {
                    debug!(line = line_num + 1, error = %e, "skipping malformed line");
                }
            }
        }

        Ok(session)
    }

    /// Build a session from already-parsed entries. Used by tests and by
    /// callers that source entries from somewhere other than a file.
    #[must_use]
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut session = Self {
            path: PathBuf::new(),
            session_id: String::new(),
            entries: Vec::new(),
            by_uuid: HashMap::new(),
            children: HashMap::new(),
            logical_parents: HashMap::new(),
        };
        for entry in entries {
            session.push(entry);
        }
        session
    }

    /// Register one entry: append it and update the lookup maps.
    ///
    /// Duplicate uuids keep the first-seen entry in every index; the later
    /// entry still appears in `entries()` at its own position.
    fn push(&mut self, entry: Entry) {
        let position = self.entries.len();
        if let Some(uuid) = entry.uuid().map(str::to_string) {
            if self.by_uuid.contains_key(&uuid) {
                debug!(%uuid, position, "duplicate uuid, keeping first-seen");
                self.entries.push(entry);
                return;
            }
            self.by_uuid.insert(uuid.clone(), position);
            if let Some(parent) = entry.parent_uuid() {
                self.children
                    .entry(parent.to_string())
                    .or_default()
                    .push(uuid.clone());
            }
            if let Some(logical) = entry.logical_parent_uuid.as_deref() {
                if logical != uuid {
                    self.logical_parents.insert(uuid, logical.to_string());
                }
            }
        }
        self.entries.push(entry);
    }

    /// Path to the backing transcript file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Session ID (filename without extension).
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// All entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Look up an entry by uuid.
    #[must_use]
    pub fn by_uuid(&self, uuid: &str) -> Option<&Entry> {
        self.by_uuid.get(uuid).map(|&pos| &self.entries[pos])
    }

    /// Child uuids of a parent, in file order.
    #[must_use]
    pub fn children_of(&self, uuid: &str) -> &[String] {
        self.children.get(uuid).map_or(&[], Vec::as_slice)
    }

    /// Logical parent of a uuid, when the entry carries a non-self link.
    #[must_use]
    pub fn logical_parent_of(&self, uuid: &str) -> Option<&str> {
        self.logical_parents.get(uuid).map(String::as_str)
    }

    /// File position of the entry carrying a uuid.
    #[must_use]
    pub fn position_of(&self, uuid: &str) -> Option<usize> {
        self.by_uuid.get(uuid).copied()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the session holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The session headline from the first summary entry, if any.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.kind == EntryKind::Summary)
            .and_then(|e| e.summary.as_deref())
    }

    /// The user-assigned title from the last custom-title entry, if any.
    #[must_use]
    pub fn custom_title(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.kind == EntryKind::CustomTitle)
            .and_then(|e| e.custom_title.as_deref())
    }

    /// First real user prompt (string content, non-sidechain).
    #[must_use]
    pub fn first_user_prompt(&self) -> Option<&str> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::User && !e.is_sidechain())
            .find_map(|e| e.message.as_ref().and_then(|m| m.content.as_text()))
    }

    /// Count of user and assistant entries.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.kind, EntryKind::User | EntryKind::Assistant))
            .count()
    }
}
