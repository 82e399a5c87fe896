//! Project directory discovery.
//!
//! Claude Code stores each project's sessions under
//! `~/.claude/projects/<key>/`, where the key is the project's absolute
//! path with every `/` replaced by `-`. This module locates the data
//! directory, maps working directories to project directories, and lists
//! known projects.
//!
//! Resolution results are cached process-wide; the cache lives here in the
//! collaborator layer, never in the core.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{RecapError, Result};

/// Default Claude Code data directory name.
pub const CLAUDE_DIR_NAME: &str = ".claude";

/// Projects subdirectory name.
pub const PROJECTS_DIR_NAME: &str = "projects";

/// Session files produced by subagents, excluded from listings.
const AGENT_FILE_PREFIX: &str = "agent-";

/// Process-wide cache of working-directory resolutions, keyed by
/// (projects dir, working dir).
static RESOLUTION_CACHE: Lazy<RwLock<HashMap<(PathBuf, PathBuf), Option<PathBuf>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// A known project with at least one session.
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    /// Encoded directory name (the project key).
    pub name: String,
    /// Full path to the project directory.
    pub path: PathBuf,
    /// Number of session files (excluding agent files).
    pub session_count: usize,
    /// Most recent session modification time.
    pub modified: SystemTime,
}

/// Resolves project directories under one Claude data directory.
#[derive(Debug, Clone)]
pub struct ProjectResolver {
    projects_dir: PathBuf,
}

impl ProjectResolver {
    /// Resolver over an explicit projects directory.
    #[must_use]
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
        }
    }

    /// Resolver over the discovered Claude data directory.
    pub fn discover() -> Result<Self> {
        Ok(Self::new(claude_dir()?.join(PROJECTS_DIR_NAME)))
    }

    /// The projects directory this resolver scans.
    #[must_use]
    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    /// Encode a project path into its directory key.
    #[must_use]
    pub fn project_key(path: &Path) -> String {
        path.to_string_lossy().replace('/', "-")
    }

    /// Find the project directory for a working directory, matching the
    /// encoded key case-insensitively. Results are cached process-wide.
    #[must_use]
    pub fn find_project_dir(&self, cwd: &Path) -> Option<PathBuf> {
        let cache_key = (self.projects_dir.clone(), cwd.to_path_buf());
        if let Some(cached) = RESOLUTION_CACHE.read().get(&cache_key) {
            return cached.clone();
        }

        let key = Self::project_key(cwd);
        let found = self.project_dirs().into_iter().find(|dir| {
            dir.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.eq_ignore_ascii_case(&key))
        });

        RESOLUTION_CACHE.write().insert(cache_key, found.clone());
        found
    }

    /// All projects that contain at least one session, most recent first.
    #[must_use]
    pub fn list_all_projects(&self) -> Vec<ProjectInfo> {
        let mut projects: Vec<ProjectInfo> = self
            .project_dirs()
            .into_iter()
            .filter_map(|dir| {
                let sessions = session_files(&dir);
                if sessions.is_empty() {
                    return None;
                }
                let modified = sessions
                    .iter()
                    .map(|(_, mtime)| *mtime)
                    .max()
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                Some(ProjectInfo {
                    name: dir.file_name()?.to_str()?.to_string(),
                    session_count: sessions.len(),
                    path: dir,
                    modified,
                })
            })
            .collect();

        projects.sort_by(|a, b| b.modified.cmp(&a.modified));
        projects
    }

    /// Resolve the project directory to operate on.
    ///
    /// With an override, tries in order: exact key match, the override
    /// interpreted as a real path, then partial key match. Without one,
    /// the current working directory must map to a project.
    pub fn resolve(&self, project_override: Option<&str>) -> Result<PathBuf> {
        if let Some(wanted) = project_override {
            let dirs = self.project_dirs();
            let name_of =
                |dir: &PathBuf| dir.file_name().and_then(|n| n.to_str()).map(str::to_string);

            if let Some(dir) = dirs.iter().find(|d| {
                name_of(d).is_some_and(|name| name.eq_ignore_ascii_case(wanted))
            }) {
                return Ok(dir.clone());
            }

            let path_key = Self::project_key(Path::new(wanted));
            if let Some(dir) = dirs.iter().find(|d| {
                name_of(d).is_some_and(|name| name.eq_ignore_ascii_case(&path_key))
            }) {
                return Ok(dir.clone());
            }

            let wanted_lower = wanted.to_lowercase();
            if let Some(dir) = dirs.iter().find(|d| {
                name_of(d).is_some_and(|name| name.to_lowercase().contains(&wanted_lower))
            }) {
                return Ok(dir.clone());
            }

            return Err(RecapError::ProjectNotFound {
                hint: wanted.to_string(),
            });
        }

        let cwd = std::env::current_dir()
            .map_err(|e| RecapError::io("Failed to read current directory", e))?;
        self.find_project_dir(&cwd)
            .ok_or_else(|| RecapError::ProjectNotFound {
                hint: cwd.display().to_string(),
            })
    }

    /// All directories directly under the projects dir.
    fn project_dirs(&self) -> Vec<PathBuf> {
        let Ok(read) = std::fs::read_dir(&self.projects_dir) else {
            debug!(dir = %self.projects_dir.display(), "projects directory not readable");
            return Vec::new();
        };
        let mut dirs: Vec<PathBuf> = read
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();
        dirs
    }
}

/// Discover the Claude Code data directory.
///
/// Checks `CLAUDE_CODE_DIR` first, then `~/.claude`.
pub fn claude_dir() -> Result<PathBuf> {
    if let Ok(env_dir) = std::env::var("CLAUDE_CODE_DIR") {
        let path = PathBuf::from(env_dir);
        if path.exists() {
            return Ok(path);
        }
    }

    let home = directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| RecapError::ClaudeDirectoryNotFound {
            expected_path: PathBuf::from("~/.claude"),
        })?;

    let path = home.join(CLAUDE_DIR_NAME);
    if path.exists() {
        Ok(path)
    } else {
        Err(RecapError::ClaudeDirectoryNotFound {
            expected_path: path,
        })
    }
}

/// Session files in a project directory with their mtimes, excluding
/// `agent-*.jsonl` subagent files. Unsorted.
pub(crate) fn session_files(project_dir: &Path) -> Vec<(PathBuf, SystemTime)> {
    let Ok(read) = std::fs::read_dir(project_dir) else {
        return Vec::new();
    };
    read.filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension().is_some_and(|ext| ext == "jsonl")
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| !name.starts_with(AGENT_FILE_PREFIX))
        })
        .filter_map(|p| {
            let mtime = std::fs::metadata(&p).and_then(|m| m.modified()).ok()?;
            Some((p, mtime))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_projects_dir() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let projects = tmp.path().join("projects");
        fs::create_dir_all(&projects).unwrap();
        (tmp, projects)
    }

    fn add_project(projects: &Path, name: &str, sessions: &[&str]) -> PathBuf {
        let dir = projects.join(name);
        fs::create_dir_all(&dir).unwrap();
        for session in sessions {
            fs::write(dir.join(session), "{\"type\":\"user\"}\n").unwrap();
        }
        dir
    }

    #[test]
    fn test_project_key() {
        assert_eq!(
            ProjectResolver::project_key(Path::new("/home/user/project")),
            "-home-user-project"
        );
        assert_eq!(ProjectResolver::project_key(Path::new("/")), "-");
    }

    #[test]
    fn test_find_project_dir_exact_and_case_insensitive() {
        let (_tmp, projects) = make_projects_dir();
        let dir = add_project(&projects, "-Home-Test", &["s1.jsonl"]);
        let resolver = ProjectResolver::new(&projects);

        assert_eq!(
            resolver.find_project_dir(Path::new("/home/test")),
            Some(dir)
        );
        assert_eq!(resolver.find_project_dir(Path::new("/nonexistent")), None);
    }

    #[test]
    fn test_list_all_projects_filters_and_sorts() {
        let (_tmp, projects) = make_projects_dir();
        add_project(&projects, "-home-old", &["s1.jsonl"]);
        add_project(&projects, "-empty-project", &[]);
        // Agent files do not count as sessions.
        add_project(&projects, "-agents-only", &[]);
        fs::write(projects.join("-agents-only").join("agent-x.jsonl"), "{}\n").unwrap();
        // Stray files are skipped.
        fs::write(projects.join("stray.txt"), "not a directory").unwrap();

        let resolver = ProjectResolver::new(&projects);
        let listed = resolver.list_all_projects();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "-home-old");
        assert_eq!(listed[0].session_count, 1);
    }

    #[test]
    fn test_list_all_projects_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let resolver = ProjectResolver::new(tmp.path().join("nonexistent"));
        assert!(resolver.list_all_projects().is_empty());
    }

    #[test]
    fn test_resolve_override_exact() {
        let (_tmp, projects) = make_projects_dir();
        let dir = add_project(&projects, "-home-test", &["s.jsonl"]);
        let resolver = ProjectResolver::new(&projects);
        assert_eq!(resolver.resolve(Some("-home-test")).unwrap(), dir);
    }

    #[test]
    fn test_resolve_override_partial() {
        let (_tmp, projects) = make_projects_dir();
        let dir = add_project(&projects, "-home-test-project", &["s.jsonl"]);
        let resolver = ProjectResolver::new(&projects);
        assert_eq!(resolver.resolve(Some("test-project")).unwrap(), dir);
    }

    #[test]
    fn test_resolve_override_by_path() {
        let (_tmp, projects) = make_projects_dir();
        let real = TempDir::new().unwrap();
        let key = ProjectResolver::project_key(real.path());
        let dir = add_project(&projects, &key, &["s.jsonl"]);
        let resolver = ProjectResolver::new(&projects);
        assert_eq!(
            resolver
                .resolve(Some(real.path().to_str().unwrap()))
                .unwrap(),
            dir
        );
    }

    #[test]
    fn test_resolve_override_not_found() {
        let (_tmp, projects) = make_projects_dir();
        let resolver = ProjectResolver::new(&projects);
        let err = resolver.resolve(Some("nonexistent-project-xyz")).unwrap_err();
        assert!(matches!(err, RecapError::ProjectNotFound { .. }));
    }

    #[test]
    fn test_session_files_excludes_agents() {
        let (_tmp, projects) = make_projects_dir();
        let dir = add_project(&projects, "-p", &["a.jsonl", "b.jsonl"]);
        fs::write(dir.join("agent-123.jsonl"), "{}\n").unwrap();
        fs::write(dir.join("notes.txt"), "x").unwrap();

        let files = session_files(&dir);
        assert_eq!(files.len(), 2);
    }
}
