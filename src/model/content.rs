//! Content block types for Claude Code JSONL logs.
//!
//! A message body carries either a plain string or an ordered list of
//! content blocks. The block kinds this crate interprets are:
//! - `text`: natural language
//! - `tool_use`: tool invocation requests
//! - `tool_result`: tool execution outcomes
//! - `thinking`: extended reasoning
//!
//! Anything else deserializes to [`ContentBlock::Unknown`] and is skipped
//! by consumers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::UnknownFields;

/// Message body: role plus string-or-blocks content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Message role ("user" or "assistant").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// The content payload.
    #[serde(default)]
    pub content: MessageContent,

    /// Unknown fields for forward compatibility.
    #[serde(flatten)]
    pub extra: UnknownFields,
}

/// Message content - either a simple string or an array of content blocks.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple string content (direct human input).
    Text(String),
    /// Array of content blocks (assistant output, tool results).
    Blocks(Vec<ContentBlock>),
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Blocks(Vec::new())
    }
}

impl<'de> Deserialize<'de> for MessageContent {
    // Lenient by contract: list elements that are not objects, or objects
    // that fail to parse as a known block shape, are dropped rather than
    // failing the whole entry.
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(s) => Ok(Self::Text(s)),
            Value::Array(items) => Ok(Self::Blocks(
                items
                    .into_iter()
                    .filter(Value::is_object)
                    .filter_map(|v| serde_json::from_value::<ContentBlock>(v).ok())
                    .collect(),
            )),
            _ => Ok(Self::Blocks(Vec::new())),
        }
    }
}

impl MessageContent {
    /// Get the text if this is simple string content.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Blocks(_) => None,
        }
    }

    /// Get the content blocks, empty for string content.
    #[must_use]
    pub fn blocks(&self) -> &[ContentBlock] {
        match self {
            Self::Text(_) => &[],
            Self::Blocks(b) => b,
        }
    }

    /// First piece of displayable text: the string itself, or the first
    /// `text` block.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Blocks(blocks) => blocks.iter().find_map(|b| match b {
                ContentBlock::Text(t) => Some(t.text.as_str()),
                _ => None,
            }),
        }
    }

    /// All text: the string itself, or every `text` block joined with
    /// newlines. Empty string when there is no text at all.
    #[must_use]
    pub fn joined_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::Text(t) => Some(t.text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// All tool_use blocks, in order.
    #[must_use]
    pub fn tool_uses(&self) -> Vec<&ToolUseBlock> {
        self.blocks()
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// All tool_result blocks, in order.
    #[must_use]
    pub fn tool_results(&self) -> Vec<&ToolResultBlock> {
        self.blocks()
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolResult(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// Check if any block is a tool invocation.
    #[must_use]
    pub fn has_tool_use(&self) -> bool {
        self.blocks()
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse(_)))
    }

    /// Check if any block is a tool result.
    #[must_use]
    pub fn has_tool_result(&self) -> bool {
        self.blocks()
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolResult(_)))
    }
}

/// A single content block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Natural language text.
    Text(TextBlock),

    /// Tool invocation request.
    ToolUse(ToolUseBlock),

    /// Tool execution outcome.
    ToolResult(ToolResultBlock),

    /// Extended reasoning.
    Thinking(ThinkingBlock),

    /// Unrecognized block kind, tolerated and ignored.
    #[serde(other)]
    Unknown,
}

/// Text content block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextBlock {
    /// The text content.
    #[serde(default)]
    pub text: String,

    /// Unknown fields for forward compatibility.
    #[serde(flatten)]
    pub extra: UnknownFields,
}

/// Tool use content block - a tool invocation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolUseBlock {
    /// Tool use ID.
    #[serde(default)]
    pub id: String,

    /// Tool name.
    #[serde(default)]
    pub name: String,

    /// Tool input parameters.
    #[serde(default)]
    pub input: Value,

    /// Unknown fields for forward compatibility.
    #[serde(flatten)]
    pub extra: UnknownFields,
}

/// Tool result content block - a tool execution outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolResultBlock {
    /// Links to the corresponding tool_use id.
    #[serde(default)]
    pub tool_use_id: String,

    /// Result content - string, array of text blocks, or absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ToolResultContent>,

    /// Error state (absent means success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,

    /// Unknown fields for forward compatibility.
    #[serde(flatten)]
    pub extra: UnknownFields,
}

impl ToolResultBlock {
    /// Check if this result is an explicit error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Flatten the result payload into plain text.
    ///
    /// String content is returned as-is; list content concatenates the
    /// `text` field of object elements, skipping everything else.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.content {
            None => String::new(),
            Some(ToolResultContent::Text(s)) => s.clone(),
            Some(ToolResultContent::Parts(items)) => items
                .iter()
                .filter_map(|v| {
                    let obj = v.as_object()?;
                    if obj.get("type").and_then(Value::as_str) == Some("text") {
                        obj.get("text").and_then(Value::as_str)
                    } else {
                        None
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Tool result payload - either a string or a list of block-like values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ToolResultContent {
    /// String content (most tools).
    Text(String),

    /// Array of content parts (some tools return block lists).
    Parts(Vec<Value>),
}

/// Thinking content block - extended reasoning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThinkingBlock {
    /// Reasoning text.
    #[serde(default)]
    pub thinking: String,

    /// Verification signature, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    /// Unknown fields for forward compatibility.
    #[serde(flatten)]
    pub extra: UnknownFields,
}
