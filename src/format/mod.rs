//! Rendering of turns and raw messages for terminal and JSON output.
//!
//! Everything here is presentation: the core produces [`Turn`] and
//! [`RawMessage`] values, and this module turns them into text blocks,
//! one-line tool summaries, or stable JSON shapes for scripting.

use console::style;
use serde_json::{json, Value};

use crate::extract::{RawMessage, ToolSummary, Turn};
use crate::util::{parse_timestamp, short_path, strip_ansi, truncate};

/// Maximum length of the payload in a one-line tool summary.
const TOOL_PAYLOAD_LEN: usize = 60;

/// Path components kept when shortening file paths in tool summaries.
const TOOL_PATH_PARTS: usize = 3;

/// Display options for [`format_turn`] and [`format_raw_message`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Render tool call summaries.
    pub show_tools: bool,
    /// Render `HH:MM:SS` timestamps in headers.
    pub show_timestamp: bool,
    /// Style headers with terminal colors.
    pub color: bool,
}

impl ToolSummary {
    /// Render this tool call as a single line, e.g. `[Bash] ls -la`.
    ///
    /// Known tools show their most interesting parameter; unknown tools
    /// fall back to compact JSON of the whole input. The payload is
    /// capped at 60 characters.
    #[must_use]
    pub fn one_line(&self) -> String {
        let str_field = |key: &str| {
            self.input_data
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let payload = match self.name.as_str() {
            "Read" | "Write" | "Edit" | "MultiEdit" | "NotebookRead" | "NotebookEdit" => {
                str_field("file_path").map(|p| short_path(&p, TOOL_PATH_PARTS))
            }
            "Bash" => str_field("description").or_else(|| str_field("command")),
            "Glob" | "Grep" => str_field("pattern"),
            "WebFetch" => str_field("url"),
            "WebSearch" => str_field("query"),
            "Task" => str_field("description"),
            _ => match &self.input_data {
                Value::Object(map) if map.is_empty() => None,
                Value::Null => None,
                other => serde_json::to_string(other).ok(),
            },
        };

        match payload {
            Some(p) if !p.is_empty() => {
                format!("[{}] {}", self.name, truncate(&p, TOOL_PAYLOAD_LEN))
            }
            _ => format!("[{}]", self.name),
        }
    }
}

/// Render one turn as a text block.
#[must_use]
pub fn format_turn(turn: &Turn, index: usize, total: usize, options: &FormatOptions) -> String {
    let mut out = String::new();
    let stamp = header_timestamp(&turn.timestamp, options);

    if !turn.user_text.is_empty() || turn.is_compact_summary {
        let label = if turn.is_compact_summary {
            " [Compaction Summary]"
        } else {
            ""
        };
        let header = format!("[{index}/{total}] USER{label}{stamp}:");
        out.push_str(&paint_header(&header, options));
        out.push('\n');
        out.push_str(&turn.user_text);
        out.push('\n');
    }

    if options.show_tools && !turn.tool_calls.is_empty() {
        let header = format!(
            "[{index}/{total}] TOOLS ({} tool calls):",
            turn.tool_calls.len()
        );
        out.push('\n');
        out.push_str(&paint_header(&header, options));
        out.push('\n');
        for call in &turn.tool_calls {
            out.push_str("  ");
            out.push_str(&call.one_line());
            out.push('\n');
        }
    }

    if !turn.assistant_text.is_empty() {
        let header = format!("[{index}/{total}] ASSISTANT{stamp}:");
        out.push('\n');
        out.push_str(&paint_header(&header, options));
        out.push('\n');
        out.push_str(&turn.assistant_text);
        out.push('\n');
    }

    out
}

/// Render one raw message as a text block.
#[must_use]
pub fn format_raw_message(
    message: &RawMessage,
    index: usize,
    total: usize,
    options: &FormatOptions,
) -> String {
    let stamp = header_timestamp(&message.timestamp, options);
    let uuid = truncate(&message.uuid, 12);
    let header = format!(
        "[{index}/{total}] {}{stamp} [uuid:{uuid}]:",
        message.role.to_uppercase()
    );

    format!(
        "{}\n{}\n",
        paint_header(&header, options),
        strip_ansi(&message.content)
    )
}

/// Serialize turns into the stable JSON shape used by `--json` output.
#[must_use]
pub fn format_turns_json(
    turns: &[&Turn],
    session_id: &str,
    total_turns: usize,
    start_index: usize,
) -> String {
    let rendered: Vec<Value> = turns
        .iter()
        .enumerate()
        .map(|(offset, turn)| {
            let mut assistant = json!({ "text": turn.assistant_text });
            if !turn.tool_calls.is_empty() {
                assistant["tool_calls"] = Value::Array(
                    turn.tool_calls
                        .iter()
                        .map(|c| json!({ "name": c.name, "input": c.input_data }))
                        .collect(),
                );
            }
            json!({
                "index": start_index + offset,
                "timestamp": turn.timestamp,
                "uuid": turn.uuid,
                "is_compact_summary": turn.is_compact_summary,
                "user": { "text": turn.user_text },
                "assistant": assistant,
            })
        })
        .collect();

    let value = json!({
        "session_id": session_id,
        "total_turns": total_turns,
        "turns": rendered,
    });
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

/// Serialize raw messages into the stable JSON shape used by
/// `--raw --json` output.
#[must_use]
pub fn format_raw_json(messages: &[RawMessage], session_id: &str) -> String {
    let rendered: Vec<Value> = messages
        .iter()
        .map(|m| {
            json!({
                "role": m.role,
                "content": m.content,
                "timestamp": m.timestamp,
                "uuid": m.uuid,
                "entry_type": m.entry_type,
            })
        })
        .collect();

    let value = json!({
        "session_id": session_id,
        "total_messages": messages.len(),
        "messages": rendered,
    });
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

/// Format the optional `HH:MM:SS` header suffix.
fn header_timestamp(timestamp: &str, options: &FormatOptions) -> String {
    if !options.show_timestamp {
        return String::new();
    }
    parse_timestamp(timestamp)
        .map(|t| format!(" ({})", t.format("%H:%M:%S")))
        .unwrap_or_default()
}

fn paint_header(header: &str, options: &FormatOptions) -> String {
    if options.color {
        style(header).bold().cyan().to_string()
    } else {
        header.to_string()
    }
}
