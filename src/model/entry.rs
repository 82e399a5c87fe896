//! Transcript entry: one parsed JSONL record.
//!
//! Every line of a session log becomes one [`Entry`]. Unlike the message
//! body, the top level is a single struct rather than a tagged enum so that
//! records with unknown `type` values (or missing fields) still load and
//! keep their position in the file.

use serde::{Deserialize, Serialize};

use super::content::Message;
use super::UnknownFields;

/// Entry type discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// Human input and tool results.
    User,
    /// Model responses, tool invocations, thinking blocks.
    Assistant,
    /// Notifications and compaction markers.
    System,
    /// Session headline summaries.
    Summary,
    /// Tool progress pings.
    Progress,
    /// User-assigned session titles.
    CustomTitle,
    /// Unrecognized entry type, tolerated and carried through.
    #[default]
    #[serde(other)]
    Other,
}

/// System entry subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemSubtype {
    /// Compaction boundary marker; severs the parent chain.
    CompactBoundary,
    /// Session initialization marker.
    Init,
    /// Unknown subtype for forward compatibility.
    #[serde(other)]
    Unknown,
}

/// A parsed transcript record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Entry type.
    #[serde(rename = "type", default)]
    pub kind: EntryKind,

    /// Unique identifier (absent for summary/custom-title records).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    /// Parent entry reference (null at conversation roots).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_uuid: Option<String>,

    /// ISO 8601 timestamp, empty when absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timestamp: String,

    /// The message body, when this record carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// Subagent/sidechain indicator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_sidechain: Option<bool>,

    /// Marks the synthetic summary prompt injected after compaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_compact_summary: Option<bool>,

    /// Visible only in transcript view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible_in_transcript_only: Option<bool>,

    /// System entry subtype.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<SystemSubtype>,

    /// Pre-compaction parent, carried by some compact boundaries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_parent_uuid: Option<String>,

    /// Why generation stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,

    /// Session headline (summary records).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// User-assigned title (custom-title records).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,

    /// Unknown fields for forward compatibility.
    #[serde(flatten)]
    pub extra: UnknownFields,
}

impl Entry {
    /// Get the uuid as a string slice.
    #[must_use]
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// Get the parent uuid as a string slice.
    #[must_use]
    pub fn parent_uuid(&self) -> Option<&str> {
        self.parent_uuid.as_deref()
    }

    /// Check if this entry belongs to a sidechain.
    #[must_use]
    pub fn is_sidechain(&self) -> bool {
        self.is_sidechain.unwrap_or(false)
    }

    /// Check if this entry is a post-compaction summary prompt.
    #[must_use]
    pub fn is_compact_summary(&self) -> bool {
        self.is_compact_summary.unwrap_or(false)
    }

    /// Check if this entry is a compaction boundary marker.
    #[must_use]
    pub fn is_compact_boundary(&self) -> bool {
        self.kind == EntryKind::System && self.subtype == Some(SystemSubtype::CompactBoundary)
    }

    /// Check if this entry's message requests any tool invocation.
    #[must_use]
    pub fn has_tool_use(&self) -> bool {
        self.message
            .as_ref()
            .is_some_and(|m| m.content.has_tool_use())
    }

    /// First displayable text of the message body, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.message.as_ref().and_then(|m| m.content.first_text())
    }

    /// The entry type as the wire string.
    #[must_use]
    pub const fn kind_str(&self) -> &'static str {
        match self.kind {
            EntryKind::User => "user",
            EntryKind::Assistant => "assistant",
            EntryKind::System => "system",
            EntryKind::Summary => "summary",
            EntryKind::Progress => "progress",
            EntryKind::CustomTitle => "custom-title",
            EntryKind::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_user_entry() {
        let entry: Entry = serde_json::from_str(
            r#"{"type":"user","uuid":"u1","parentUuid":null,
                "message":{"role":"user","content":"Hello"}}"#,
        )
        .unwrap();
        assert_eq!(entry.kind, EntryKind::User);
        assert_eq!(entry.uuid(), Some("u1"));
        assert_eq!(entry.parent_uuid(), None);
        assert_eq!(entry.first_text(), Some("Hello"));
        assert!(!entry.is_sidechain());
    }

    #[test]
    fn test_unknown_type_tolerated() {
        let entry: Entry =
            serde_json::from_str(r#"{"type":"file-history-snapshot","messageId":"m1"}"#).unwrap();
        assert_eq!(entry.kind, EntryKind::Other);
        assert!(entry.extra.contains_key("messageId"));
    }

    #[test]
    fn test_missing_type_tolerated() {
        let entry: Entry = serde_json::from_str(r#"{"uuid":"u1"}"#).unwrap();
        assert_eq!(entry.kind, EntryKind::Other);
    }

    #[test]
    fn test_compact_boundary_detection() {
        let entry: Entry = serde_json::from_str(
            r#"{"type":"system","subtype":"compact_boundary","uuid":"s1",
                "parentUuid":null,"logicalParentUuid":"c1"}"#,
        )
        .unwrap();
        assert!(entry.is_compact_boundary());
        assert_eq!(entry.logical_parent_uuid.as_deref(), Some("c1"));

        let other: Entry =
            serde_json::from_str(r#"{"type":"system","subtype":"init","uuid":"s2"}"#).unwrap();
        assert!(!other.is_compact_boundary());
        assert_eq!(other.subtype, Some(SystemSubtype::Init));
    }

    #[test]
    fn test_unknown_subtype_tolerated() {
        let entry: Entry =
            serde_json::from_str(r#"{"type":"system","subtype":"hook_summary","uuid":"s1"}"#)
                .unwrap();
        assert_eq!(entry.subtype, Some(SystemSubtype::Unknown));
        assert!(!entry.is_compact_boundary());
    }

    #[test]
    fn test_custom_title_kind() {
        let entry: Entry = serde_json::from_str(
            r#"{"type":"custom-title","customTitle":"My refactor session"}"#,
        )
        .unwrap();
        assert_eq!(entry.kind, EntryKind::CustomTitle);
        assert_eq!(entry.custom_title.as_deref(), Some("My refactor session"));
        assert_eq!(entry.uuid(), None);
    }

    #[test]
    fn test_summary_entry() {
        let entry: Entry =
            serde_json::from_str(r#"{"type":"summary","summary":"Fixing the parser"}"#).unwrap();
        assert_eq!(entry.kind, EntryKind::Summary);
        assert_eq!(entry.summary.as_deref(), Some("Fixing the parser"));
    }

    #[test]
    fn test_kind_str_round_trip() {
        for (json, expected) in [
            (r#"{"type":"user"}"#, "user"),
            (r#"{"type":"assistant"}"#, "assistant"),
            (r#"{"type":"progress"}"#, "progress"),
            (r#"{"type":"custom-title"}"#, "custom-title"),
        ] {
            let entry: Entry = serde_json::from_str(json).unwrap();
            assert_eq!(entry.kind_str(), expected);
        }
    }
}
