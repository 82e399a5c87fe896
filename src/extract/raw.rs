//! Raw message extraction: one flat record per logical sub-block.
//!
//! Where turn grouping compresses, this view preserves. Every text block,
//! tool invocation, tool result, thinking block, and compaction boundary
//! on the path becomes its own record, labeled with a fixed role string
//! that callers match on.

use crate::model::{ContentBlock, Entry, EntryKind, MessageContent};
use crate::util::{strip_ansi, truncate};

/// Fixed content for compaction boundary records.
pub const COMPACT_BOUNDARY_MARKER: &str =
    "[Compaction boundary: earlier conversation was summarized]";

/// One flattened sub-block of the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    /// Role label, e.g. `"user"`, `"assistant (tool)"`,
    /// `"system (compact_boundary)"`.
    pub role: String,
    /// The sub-block's content, ANSI-stripped.
    pub content: String,
    /// Timestamp of the owning entry.
    pub timestamp: String,
    /// uuid of the owning entry.
    pub uuid: String,
    /// Type of the owning entry (`"user"`, `"assistant"`, `"system"`).
    pub entry_type: String,
}

/// Flatten an ordered entry path into raw messages.
///
/// `truncate_len` bounds tool-result, tool-use, and thinking content;
/// `-1` (or `0`) disables truncation. Plain user and assistant text is
/// never truncated.
#[must_use]
pub fn extract_raw_messages(path: &[&Entry], truncate_len: i64) -> Vec<RawMessage> {
    let limit = usize::try_from(truncate_len).unwrap_or(0);
    let mut messages = Vec::new();

    for entry in path {
        match entry.kind {
            EntryKind::System => {
                if entry.is_compact_boundary() {
                    messages.push(record(
                        entry,
                        "system (compact_boundary)",
                        COMPACT_BOUNDARY_MARKER.to_string(),
                    ));
                }
            }
            EntryKind::User => extract_user(entry, limit, &mut messages),
            EntryKind::Assistant => extract_assistant(entry, limit, &mut messages),
            _ => {}
        }
    }

    messages
}

fn extract_user(entry: &Entry, limit: usize, messages: &mut Vec<RawMessage>) {
    let Some(message) = &entry.message else {
        return;
    };
    let user_role = if entry.is_compact_summary() {
        "user (compact_summary)"
    } else {
        "user"
    };
    match &message.content {
        MessageContent::Text(s) => {
            messages.push(record(entry, user_role, strip_ansi(s)));
        }
        MessageContent::Blocks(blocks) => {
            for block in blocks {
                match block {
                    ContentBlock::ToolResult(result) => {
                        let mut content = truncate(&strip_ansi(&result.text()), limit);
                        if result.is_error() {
                            content = format!("ERROR: {content}");
                        }
                        messages.push(record(entry, "user (tool_result)", content));
                    }
                    ContentBlock::Text(t) => {
                        messages.push(record(entry, user_role, strip_ansi(&t.text)));
                    }
                    _ => {}
                }
            }
        }
    }
}

fn extract_assistant(entry: &Entry, limit: usize, messages: &mut Vec<RawMessage>) {
    let Some(message) = &entry.message else {
        return;
    };
    for block in message.content.blocks() {
        match block {
            ContentBlock::Text(t) => {
                messages.push(record(entry, "assistant", strip_ansi(&t.text)));
            }
            ContentBlock::ToolUse(tool) => {
                let input = serde_json::to_string(&tool.input).unwrap_or_default();
                let content = truncate(&strip_ansi(&format!("{} {input}", tool.name)), limit);
                messages.push(record(entry, "assistant (tool)", content));
            }
            ContentBlock::Thinking(thinking) => {
                let content = truncate(&strip_ansi(&thinking.thinking), limit);
                messages.push(record(entry, "assistant (thinking)", content));
            }
            _ => {}
        }
    }
}

fn record(entry: &Entry, role: &str, content: String) -> RawMessage {
    RawMessage {
        role: role.to_string(),
        content,
        timestamp: entry.timestamp.clone(),
        uuid: entry.uuid().unwrap_or_default().to_string(),
        entry_type: entry.kind_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testutil::{assistant, entry, user};
    use crate::session::Session;
    use pretty_assertions::assert_eq;

    fn tool_session() -> Session {
        Session::from_entries(vec![
            user("u1", None, "Run ls"),
            entry(
                r#"{"type":"assistant","uuid":"a1","parentUuid":"u1",
                    "message":{"role":"assistant","content":[
                        {"type":"tool_use","id":"t1","name":"Bash","input":{"command":"ls"}}]}}"#,
            ),
            entry(r#"{"type":"progress","uuid":"pg1","parentUuid":"a1"}"#),
            entry(
                r#"{"type":"user","uuid":"r1","parentUuid":"a1",
                    "message":{"role":"user","content":[
                        {"type":"tool_result","tool_use_id":"t1","content":"file1.txt\nfile2.txt"}]}}"#,
            ),
            assistant("a2", Some("r1"), "Two files."),
        ])
    }

    #[test]
    fn test_user_and_assistant_records() {
        let session = Session::from_entries(vec![
            user("u1", None, "Hello"),
            assistant("a1", Some("u1"), "Hi"),
        ]);
        let messages = extract_raw_messages(&session.active_path(), -1);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[0].entry_type, "user");
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[1].uuid, "a1");
    }

    #[test]
    fn test_tool_use_and_result_roles() {
        let session = tool_session();
        let messages = extract_raw_messages(&session.active_path(), -1);

        let tool_msgs: Vec<_> = messages
            .iter()
            .filter(|m| m.role == "assistant (tool)")
            .collect();
        assert_eq!(tool_msgs.len(), 1);
        assert!(tool_msgs[0].content.starts_with("Bash "));
        assert!(tool_msgs[0].content.contains("\"command\":\"ls\""));

        let result_msgs: Vec<_> = messages
            .iter()
            .filter(|m| m.role == "user (tool_result)")
            .collect();
        assert_eq!(result_msgs.len(), 1);
        assert_eq!(result_msgs[0].content, "file1.txt\nfile2.txt");
    }

    #[test]
    fn test_progress_entries_skipped() {
        let session = tool_session();
        let messages = extract_raw_messages(&session.active_path(), -1);
        assert!(messages.iter().all(|m| m.entry_type != "progress"));
    }

    #[test]
    fn test_custom_title_skipped() {
        let entries = vec![
            entry(r#"{"type":"custom-title","customTitle":"Title"}"#),
            user("u1", None, "Hello"),
        ];
        let path: Vec<&Entry> = entries.iter().collect();
        let messages = extract_raw_messages(&path, -1);
        assert!(messages.iter().all(|m| m.entry_type != "custom-title"));
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_compact_boundary_record() {
        let entries = vec![entry(
            r#"{"type":"system","subtype":"compact_boundary","uuid":"s1",
                "parentUuid":null,"logicalParentUuid":"c1"}"#,
        )];
        let path: Vec<&Entry> = entries.iter().collect();
        let messages = extract_raw_messages(&path, -1);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "system (compact_boundary)");
        assert_eq!(messages[0].content, COMPACT_BOUNDARY_MARKER);
    }

    #[test]
    fn test_other_system_entries_skipped() {
        let entries = vec![entry(
            r#"{"type":"system","subtype":"init","uuid":"s1","parentUuid":null}"#,
        )];
        let path: Vec<&Entry> = entries.iter().collect();
        assert!(extract_raw_messages(&path, -1).is_empty());
    }

    #[test]
    fn test_compact_summary_role_override() {
        let entries = vec![entry(
            r#"{"type":"user","uuid":"cs1","parentUuid":null,"isCompactSummary":true,
                "message":{"role":"user","content":"Summary of earlier work"}}"#,
        )];
        let path: Vec<&Entry> = entries.iter().collect();
        let messages = extract_raw_messages(&path, -1);
        assert_eq!(messages[0].role, "user (compact_summary)");
    }

    #[test]
    fn test_error_tool_result_marked() {
        let entries = vec![entry(
            r#"{"type":"user","uuid":"r1","parentUuid":null,
                "message":{"role":"user","content":[
                    {"type":"tool_result","tool_use_id":"t1",
                     "content":"Command failed","is_error":true}]}}"#,
        )];
        let path: Vec<&Entry> = entries.iter().collect();
        let messages = extract_raw_messages(&path, -1);
        assert_eq!(messages[0].content, "ERROR: Command failed");
    }

    #[test]
    fn test_tool_result_list_content() {
        let entries = vec![entry(
            r#"{"type":"user","uuid":"r1","parentUuid":null,
                "message":{"role":"user","content":[
                    {"type":"tool_result","tool_use_id":"t1",
                     "content":[{"type":"text","text":"hello world"}]}]}}"#,
        )];
        let path: Vec<&Entry> = entries.iter().collect();
        let messages = extract_raw_messages(&path, -1);
        assert_eq!(messages[0].content, "hello world");
    }

    #[test]
    fn test_thinking_record() {
        let entries = vec![entry(
            r#"{"type":"assistant","uuid":"a1","parentUuid":null,
                "message":{"role":"assistant","content":[
                    {"type":"thinking","thinking":"Let me consider the options"}]}}"#,
        )];
        let path: Vec<&Entry> = entries.iter().collect();
        let messages = extract_raw_messages(&path, -1);
        assert_eq!(messages[0].role, "assistant (thinking)");
        assert_eq!(messages[0].content, "Let me consider the options");
    }

    #[test]
    fn test_truncation_applies_to_tool_content_only() {
        let session = tool_session();
        let messages = extract_raw_messages(&session.active_path(), 5);

        let result = messages
            .iter()
            .find(|m| m.role == "user (tool_result)")
            .unwrap();
        assert_eq!(result.content, "file1...");

        // Plain text is never truncated.
        let text = messages.iter().find(|m| m.role == "assistant").unwrap();
        assert_eq!(text.content, "Two files.");
        let prompt = messages.iter().find(|m| m.role == "user").unwrap();
        assert_eq!(prompt.content, "Run ls");
    }

    #[test]
    fn test_truncation_disabled() {
        let session = tool_session();
        for len in [-1, 0] {
            let messages = extract_raw_messages(&session.active_path(), len);
            let result = messages
                .iter()
                .find(|m| m.role == "user (tool_result)")
                .unwrap();
            assert_eq!(result.content, "file1.txt\nfile2.txt");
        }
    }

    #[test]
    fn test_truncation_boundary() {
        let content = "x".repeat(10);
        let entries = vec![entry(&format!(
            r#"{{"type":"assistant","uuid":"a1","parentUuid":null,
                "message":{{"role":"assistant","content":[
                    {{"type":"thinking","thinking":"{content}"}}]}}}}"#
        ))];
        let path: Vec<&Entry> = entries.iter().collect();

        // Exact length: unchanged.
        let exact = extract_raw_messages(&path, 10);
        assert_eq!(exact[0].content, content);

        // One over: truncated with the suffix.
        let over = extract_raw_messages(&path, 9);
        assert_eq!(over[0].content.chars().count(), 12);
        assert!(over[0].content.ends_with("..."));
    }

    #[test]
    fn test_long_tool_input_truncated() {
        let long = "x".repeat(1000);
        let entries = vec![entry(&format!(
            r#"{{"type":"assistant","uuid":"a1","parentUuid":null,
                "message":{{"role":"assistant","content":[
                    {{"type":"tool_use","id":"t1","name":"Bash",
                      "input":{{"command":"{long}"}}}}]}}}}"#
        ))];
        let path: Vec<&Entry> = entries.iter().collect();
        let messages = extract_raw_messages(&path, 50);
        assert!(messages[0].content.ends_with("..."));
        assert_eq!(messages[0].content.chars().count(), 53);
    }
}
