//! Active path selection: backward walks, compaction stitching, and
//! branch overrides.
//!
//! The active path is the canonical route from a root to the latest tip,
//! following the latest child wherever the conversation forked. Compaction
//! severs the `parentUuid` chain; when stitching is enabled the walk
//! crosses the boundary through its `logicalParentUuid` link.

use std::collections::HashSet;

use crate::error::{RecapError, Result};
use crate::model::Entry;

use super::Session;

/// Parameters for [`Session::active_path_with`].
#[derive(Debug, Clone, Copy)]
pub struct PathOptions {
    /// Branch override: 0 follows the active path, `n > 0` follows the
    /// n-th child (1-based, file order) at the first real branch point.
    pub branch: usize,
    /// Reconnect pre- and post-compaction segments through
    /// `logicalParentUuid` links.
    pub stitch: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            branch: 0,
            stitch: true,
        }
    }
}

impl Session {
    /// The active conversation path with default options (no branch
    /// override, stitching enabled).
    #[must_use]
    pub fn active_path(&self) -> Vec<&Entry> {
        self.build_active_path(true)
    }

    /// The active conversation path with explicit options.
    ///
    /// Fails with [`RecapError::BranchOutOfRange`] when `options.branch`
    /// exceeds the alternatives at the branch point (or no real branch
    /// point exists).
    pub fn active_path_with(&self, options: PathOptions) -> Result<Vec<&Entry>> {
        if options.branch == 0 {
            Ok(self.build_active_path(options.stitch))
        } else {
            self.branch_path(options.branch, options.stitch)
        }
    }

    /// Walk backward from the default tip.
    pub(super) fn build_active_path(&self, stitch: bool) -> Vec<&Entry> {
        match self.find_tip() {
            Some(tip) => self.walk_backward(tip, stitch),
            None => Vec::new(),
        }
    }

    /// Default tip: the last entry in file order that is not a sidechain.
    fn find_tip(&self) -> Option<&Entry> {
        self.entries().iter().rev().find(|e| !e.is_sidechain())
    }

    /// Follow parent links backward from `tip`, returning entries in
    /// root-to-tip order. A revisited uuid terminates the walk.
    fn walk_backward<'a>(&'a self, tip: &'a Entry, stitch: bool) -> Vec<&'a Entry> {
        let mut reversed: Vec<&Entry> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = Some(tip);

        while let Some(entry) = current {
            if let Some(uuid) = entry.uuid() {
                if !visited.insert(uuid) {
                    break;
                }
            }
            reversed.push(entry);
            current = self.step_back(entry, stitch);
        }

        reversed.reverse();
        reversed
    }

    /// Resolve the next entry of the backward walk: the parent when it
    /// exists, otherwise the compaction stitch when allowed.
    fn step_back(&self, entry: &Entry, stitch: bool) -> Option<&Entry> {
        if let Some(parent) = entry.parent_uuid() {
            if let Some(resolved) = self.by_uuid(parent) {
                return Some(resolved);
            }
        }
        // Parent link broken: null, or pointing outside the store.
        if stitch && entry.is_compact_boundary() {
            if let Some(logical) = entry.uuid().and_then(|u| self.logical_parent_of(u)) {
                return self.by_uuid(logical);
            }
        }
        None
    }

    /// Active path with the branch override applied at the first real
    /// branch point.
    fn branch_path(&self, branch: usize, stitch: bool) -> Result<Vec<&Entry>> {
        let active = self.build_active_path(stitch);
        let points = self.branch_points_on(&active);

        let Some(point) = points.first() else {
            return Err(RecapError::BranchOutOfRange {
                requested: branch,
                available: 0,
            });
        };
        if branch > point.children.len() {
            return Err(RecapError::BranchOutOfRange {
                requested: branch,
                available: point.children.len(),
            });
        }
        let selected = &point.children[branch - 1];

        // Prefix: the active path up to and including the branch parent.
        let parent_index = active
            .iter()
            .position(|e| e.uuid() == Some(point.parent_uuid.as_str()));
        let Some(parent_index) = parent_index else {
            return Err(RecapError::BranchOutOfRange {
                requested: branch,
                available: point.children.len(),
            });
        };
        let mut path: Vec<&Entry> = active[..=parent_index].to_vec();

        // Suffix: forward walk from the selected child, always taking the
        // highest-position child.
        let mut visited: HashSet<&str> = path.iter().filter_map(|e| e.uuid()).collect();
        let mut current = self.by_uuid(&selected.uuid);
        while let Some(entry) = current {
            let Some(uuid) = entry.uuid() else { break };
            if !visited.insert(uuid) {
                break;
            }
            path.push(entry);
            current = self
                .children_of(uuid)
                .last()
                .and_then(|child| self.by_uuid(child));
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use crate::session::testutil::{assistant, entry, progress, user};
    use crate::session::{PathOptions, Session};
    use crate::error::RecapError;

    fn uuids(path: &[&crate::model::Entry]) -> Vec<String> {
        path.iter()
            .map(|e| e.uuid().unwrap_or("").to_string())
            .collect()
    }

    fn linear_session() -> Session {
        Session::from_entries(vec![
            entry(r#"{"type":"summary","summary":"Simple test conversation"}"#),
            user("u1", None, "Hello"),
            assistant("a1", Some("u1"), "Hi there"),
            user("u2", Some("a1"), "How are you?"),
            assistant("a2", Some("u2"), "I am fine"),
            user("u3", Some("a2"), "Bye"),
            assistant("a3", Some("u3"), "See you later"),
        ])
    }

    fn branched_session() -> Session {
        Session::from_entries(vec![
            user("u1", None, "Pick one"),
            assistant("p", Some("u1"), "Which?"),
            assistant("c1", Some("p"), "option A"),
            user("f1", Some("c1"), "thanks A"),
            assistant("c2", Some("p"), "option B"),
            user("f2", Some("c2"), "thanks B"),
        ])
    }

    fn compacted_session() -> Session {
        Session::from_entries(vec![
            user("A", None, "start"),
            assistant("B", Some("A"), "working"),
            user("C", Some("B"), "continue"),
            entry(
                r#"{"type":"system","subtype":"compact_boundary","uuid":"S",
                    "parentUuid":null,"logicalParentUuid":"C",
                    "content":"Conversation compacted"}"#,
            ),
            user("D", Some("S"), "after compaction"),
            assistant("E", Some("D"), "resumed"),
        ])
    }

    #[test]
    fn test_simple_linear_path() {
        let session = linear_session();
        let path = session.active_path();
        assert_eq!(uuids(&path), ["u1", "a1", "u2", "a2", "u3", "a3"]);
    }

    #[test]
    fn test_parent_links_hold_along_path() {
        let session = linear_session();
        let path = session.active_path();
        for pair in path.windows(2) {
            assert_eq!(pair[1].parent_uuid(), pair[0].uuid());
        }
    }

    #[test]
    fn test_tip_skips_sidechain() {
        let session = Session::from_entries(vec![
            user("u1", None, "Hi"),
            assistant("a1", Some("u1"), "Hello"),
            entry(
                r#"{"type":"assistant","uuid":"side","parentUuid":"u1","isSidechain":true,
                    "message":{"role":"assistant","content":[{"type":"text","text":"Sidechain"}]}}"#,
            ),
        ]);
        let path = session.active_path();
        assert_eq!(uuids(&path), ["u1", "a1"]);
    }

    #[test]
    fn test_branched_follows_latest() {
        let session = branched_session();
        let path = session.active_path();
        let ids = uuids(&path);
        assert!(ids.contains(&"c2".to_string()));
        assert!(ids.contains(&"f2".to_string()));
        assert!(!ids.contains(&"c1".to_string()));
    }

    #[test]
    fn test_branch_override() {
        let session = branched_session();

        let one = session
            .active_path_with(PathOptions {
                branch: 1,
                stitch: true,
            })
            .unwrap();
        assert_eq!(uuids(&one), ["u1", "p", "c1", "f1"]);

        let two = session
            .active_path_with(PathOptions {
                branch: 2,
                stitch: true,
            })
            .unwrap();
        assert_eq!(uuids(&two), ["u1", "p", "c2", "f2"]);
    }

    #[test]
    fn test_branch_out_of_range() {
        let session = branched_session();
        let err = session
            .active_path_with(PathOptions {
                branch: 3,
                stitch: true,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            RecapError::BranchOutOfRange {
                requested: 3,
                available: 2
            }
        ));
    }

    #[test]
    fn test_branch_on_linear_session_is_out_of_range() {
        let session = linear_session();
        let err = session
            .active_path_with(PathOptions {
                branch: 1,
                stitch: true,
            })
            .unwrap_err();
        assert!(matches!(err, RecapError::BranchOutOfRange { .. }));
    }

    #[test]
    fn test_compaction_stitch() {
        let session = compacted_session();
        let path = session.active_path();
        assert_eq!(uuids(&path), ["A", "B", "C", "S", "D", "E"]);
    }

    #[test]
    fn test_no_stitch_stops_at_boundary() {
        let session = compacted_session();
        let path = session
            .active_path_with(PathOptions {
                branch: 0,
                stitch: false,
            })
            .unwrap();
        assert_eq!(uuids(&path), ["S", "D", "E"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let session = Session::from_entries(vec![
            user("u1", Some("u2"), "one"),
            user("u2", Some("u1"), "two"),
        ]);
        let path = session.active_path();
        // Walk stops on first revisit instead of looping forever.
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_dangling_parent_is_root() {
        let session = Session::from_entries(vec![
            user("u1", Some("missing"), "orphan"),
            assistant("a1", Some("u1"), "reply"),
        ]);
        let path = session.active_path();
        assert_eq!(uuids(&path), ["u1", "a1"]);
    }

    #[test]
    fn test_tool_fork_path_follows_result_chain() {
        let session = Session::from_entries(vec![
            user("u1", None, "Run ls"),
            entry(
                r#"{"type":"assistant","uuid":"a1","parentUuid":"u1",
                    "message":{"role":"assistant","content":[
                        {"type":"tool_use","id":"t1","name":"Bash","input":{"command":"ls"}}]}}"#,
            ),
            progress("pg1", "a1"),
            entry(
                r#"{"type":"user","uuid":"r1","parentUuid":"a1",
                    "message":{"role":"user","content":[
                        {"type":"tool_result","tool_use_id":"t1","content":"file1.txt\nfile2.txt"}]}}"#,
            ),
            assistant("a2", Some("r1"), "Two files."),
        ]);
        let path = session.active_path();
        let ids = uuids(&path);
        assert!(ids.contains(&"u1".to_string()));
        assert!(ids.contains(&"a2".to_string()));
        assert!(!ids.contains(&"pg1".to_string()));
    }

    #[test]
    fn test_system_only_session_has_nonempty_path() {
        let session = Session::from_entries(vec![entry(
            r#"{"type":"system","subtype":"init","uuid":"s1","parentUuid":null}"#,
        )]);
        assert_eq!(session.active_path().len(), 1);
    }
}
