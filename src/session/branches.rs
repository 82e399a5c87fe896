//! Branch point classification.
//!
//! A parent with several children is only a *real* branch when a user
//! resent or edited a prompt, or the assistant produced alternatives.
//! Tool execution and progress pings also fork the graph, but those forks
//! are mechanical and must not be reported as branches.

use std::collections::HashSet;

use crate::model::{Entry, EntryKind};
use crate::util::{strip_ansi, truncate};

use super::Session;

/// Maximum preview length for branch children.
const PREVIEW_LEN: usize = 60;

/// A real fork in the conversation graph.
#[derive(Debug, Clone)]
pub struct BranchInfo {
    /// uuid of the forking parent.
    pub parent_uuid: String,
    /// All children of the parent, in file-position order.
    pub children: Vec<BranchChild>,
}

/// One selectable child at a branch point.
#[derive(Debug, Clone)]
pub struct BranchChild {
    /// uuid of the child entry.
    pub uuid: String,
    /// Short text preview of the child.
    pub preview: String,
    /// Whether this child lies on the active path.
    pub is_active: bool,
    /// File position of the child.
    pub position: usize,
}

impl Session {
    /// Real branch points along the active path, in path order.
    #[must_use]
    pub fn branch_points(&self) -> Vec<BranchInfo> {
        let active = self.build_active_path(true);
        self.branch_points_on(&active)
    }

    /// Real branch points along an explicit path.
    pub(super) fn branch_points_on(&self, active: &[&Entry]) -> Vec<BranchInfo> {
        let active_uuids: HashSet<&str> = active.iter().filter_map(|e| e.uuid()).collect();
        let mut points = Vec::new();

        for entry in active {
            let Some(uuid) = entry.uuid() else { continue };
            let children = self.children_of(uuid);
            if children.len() < 2 || self.is_mechanical_fork(uuid, children) {
                continue;
            }
            points.push(BranchInfo {
                parent_uuid: uuid.to_string(),
                children: children
                    .iter()
                    .map(|child| BranchChild {
                        uuid: child.clone(),
                        preview: self.by_uuid(child).map(preview).unwrap_or_default(),
                        is_active: active_uuids.contains(child.as_str()),
                        position: self.position_of(child).unwrap_or(0),
                    })
                    .collect(),
            });
        }

        points
    }

    /// Check whether a multi-child parent is a mechanical fork.
    ///
    /// Mechanical means either the parent requested a tool (the children
    /// are progress pings, tool results, and continuations of one
    /// execution), or at most one child is something other than a
    /// progress ping.
    pub(super) fn is_mechanical_fork(&self, parent: &str, children: &[String]) -> bool {
        if self.by_uuid(parent).is_some_and(Entry::has_tool_use) {
            return true;
        }
        let non_progress = children
            .iter()
            .filter(|child| {
                self.by_uuid(child)
                    .map_or(true, |e| e.kind != EntryKind::Progress)
            })
            .count();
        non_progress <= 1
    }
}

/// Short displayable preview of an entry.
fn preview(entry: &Entry) -> String {
    if let Some(text) = entry.first_text() {
        return truncate(&strip_ansi(text), PREVIEW_LEN);
    }
    if let Some(message) = &entry.message {
        if let Some(tool) = message.content.tool_uses().first() {
            return format!("[{}]", tool.name);
        }
    }
    "(no content)".to_string()
}

#[cfg(test)]
mod tests {
    use crate::session::testutil::{assistant, entry, progress, user};
    use crate::session::Session;

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

    fn tool_session() -> Session {
        Session::from_entries(vec![
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
                        {"type":"tool_result","tool_use_id":"t1","content":"ok"}]}}"#,
            ),
            assistant("a2", Some("r1"), "Done"),
        ])
    }

    #[test]
    fn test_linear_session_has_no_branch_points() {
        let session = Session::from_entries(vec![
            user("u1", None, "Hello"),
            assistant("a1", Some("u1"), "Hi"),
        ]);
        assert!(session.branch_points().is_empty());
    }

    #[test]
    fn test_tool_fork_is_mechanical() {
        let session = tool_session();
        assert!(session.is_mechanical_fork("a1", session.children_of("a1")));
        assert!(session.branch_points().is_empty());
    }

    #[test]
    fn test_progress_only_fork_is_mechanical() {
        let session = Session::from_entries(vec![
            assistant("p1", None, "Hi"),
            progress("c1", "p1"),
            user("c2", Some("p1"), "Next"),
        ]);
        assert!(session.is_mechanical_fork("p1", session.children_of("p1")));
        assert!(session.branch_points().is_empty());
    }

    #[test]
    fn test_real_branch_is_reported() {
        let session = branched_session();
        assert!(!session.is_mechanical_fork("p", session.children_of("p")));

        let points = session.branch_points();
        assert_eq!(points.len(), 1);
        let point = &points[0];
        assert_eq!(point.parent_uuid, "p");
        assert_eq!(point.children.len(), 2);
    }

    #[test]
    fn test_branch_children_previews_and_active_flag() {
        let session = branched_session();
        let points = session.branch_points();
        let children = &points[0].children;

        assert!(children[0].preview.contains("option A"));
        assert!(children[1].preview.contains("option B"));
        assert!(children[0].position < children[1].position);

        // The later child is on the active path.
        let active: Vec<_> = children.iter().filter(|c| c.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].uuid, "c2");
    }

    #[test]
    fn test_preview_truncated() {
        let long = "x".repeat(200);
        let session = Session::from_entries(vec![
            assistant("p", None, "Which?"),
            assistant("c1", Some("p"), &long),
            user("f1", Some("c1"), "ok"),
            assistant("c2", Some("p"), "short"),
            user("f2", Some("c2"), "ok"),
        ]);
        let points = session.branch_points();
        assert_eq!(points.len(), 1);
        let preview = &points[0].children[0].preview;
        assert!(preview.len() <= 63);
        assert!(preview.ends_with("..."));
    }
}
