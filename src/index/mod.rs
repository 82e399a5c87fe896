//! Session resolution and sidecar metadata.
//!
//! A project directory holds one `.jsonl` file per session, plus an
//! optional `sessions-index.json` sidecar written by Claude Code with
//! precomputed metadata. [`SessionIndex`] serves metadata from the
//! sidecar when available (fast path) and falls back to scanning the
//! transcript (slow path). The sidecar is never written by this crate;
//! a corrupt one is treated as absent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::discovery::session_files;
use crate::error::{RecapError, Result};
use crate::session::Session;

/// Sidecar index filename.
pub const INDEX_FILE_NAME: &str = "sessions-index.json";

/// Metadata for one session file.
#[derive(Debug, Clone)]
pub struct SessionMeta {
    /// Session ID (filename without extension).
    pub session_id: String,
    /// Path to the session file.
    pub path: PathBuf,
    /// Conversation headline, when known.
    pub summary: Option<String>,
    /// First user prompt, when known.
    pub first_prompt: Option<String>,
    /// Number of user/assistant messages.
    pub message_count: usize,
    /// File modification time.
    pub modified: SystemTime,
}

/// The sidecar file shape: a map or list of per-session records.
#[derive(Debug, Default, Deserialize)]
struct SidecarFile {
    #[serde(default)]
    entries: Vec<SidecarEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SidecarEntry {
    session_id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    first_prompt: Option<String>,
    #[serde(default)]
    message_count: Option<usize>,
    #[serde(flatten)]
    _extra: IndexMap<String, serde_json::Value>,
}

/// Metadata source for the sessions of one project directory.
#[derive(Debug)]
pub struct SessionIndex {
    project_dir: PathBuf,
    sidecar: OnceCell<HashMap<String, SidecarEntry>>,
}

impl SessionIndex {
    /// Index over a project directory.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            sidecar: OnceCell::new(),
        }
    }

    /// Metadata for one session, preferring the sidecar.
    pub fn get_metadata(&self, session_id: &str, path: &Path) -> Result<SessionMeta> {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        if let Some(entry) = self.sidecar().get(session_id) {
            if let Some(message_count) = entry.message_count {
                return Ok(SessionMeta {
                    session_id: session_id.to_string(),
                    path: path.to_path_buf(),
                    summary: entry.summary.clone(),
                    first_prompt: entry.first_prompt.clone(),
                    message_count,
                    modified,
                });
            }
        }

        debug!(session_id, "sidecar miss, scanning transcript");
        let session = Session::load(path)?;
        Ok(SessionMeta {
            session_id: session_id.to_string(),
            path: path.to_path_buf(),
            summary: session.summary().map(str::to_string),
            first_prompt: session.first_user_prompt().map(str::to_string),
            message_count: session.message_count(),
            modified,
        })
    }

    /// Metadata for the project's sessions, most recent first.
    pub fn list_sessions(&self, limit: usize) -> Result<Vec<SessionMeta>> {
        let mut files = session_files(&self.project_dir);
        files.sort_by(|a, b| b.1.cmp(&a.1));

        files
            .into_iter()
            .take(limit)
            .map(|(path, _)| {
                let session_id = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown")
                    .to_string();
                self.get_metadata(&session_id, &path)
            })
            .collect()
    }

    /// The parsed sidecar, loaded once. Missing or corrupt files yield an
    /// empty map.
    fn sidecar(&self) -> &HashMap<String, SidecarEntry> {
        self.sidecar.get_or_init(|| {
            let path = self.project_dir.join(INDEX_FILE_NAME);
            let Ok(bytes) = std::fs::read_to_string(&path) else {
                return HashMap::new();
            };
            match serde_json::from_str::<SidecarFile>(&bytes) {
                Ok(file) => file
                    .entries
                    .into_iter()
                    .map(|e| (e.session_id.clone(), e))
                    .collect(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring corrupt session index");
                    HashMap::new()
                }
            }
        })
    }
}

/// Resolve a session selector to a transcript path.
///
/// `None` picks the most recently modified session; a numeric selector is
/// a 1-based index into the mtime-sorted list; anything else matches a
/// session ID prefix. Subagent (`agent-*`) files are never considered.
pub fn resolve_session(project_dir: &Path, selector: Option<&str>) -> Result<PathBuf> {
    let mut files = session_files(project_dir);
    files.sort_by(|a, b| b.1.cmp(&a.1));

    let Some(selector) = selector else {
        return files
            .first()
            .map(|(path, _)| path.clone())
            .ok_or_else(|| RecapError::SessionNotFound {
                selector: "(latest)".to_string(),
            });
    };

    if let Ok(position) = selector.parse::<usize>() {
        return files
            .get(position.wrapping_sub(1))
            .filter(|_| position >= 1)
            .map(|(path, _)| path.clone())
            .ok_or_else(|| RecapError::SessionNotFound {
                selector: selector.to_string(),
            });
    }

    files
        .iter()
        .find(|(path, _)| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem.starts_with(selector))
        })
        .map(|(path, _)| path.clone())
        .ok_or_else(|| RecapError::SessionNotFound {
            selector: selector.to_string(),
        })
}
