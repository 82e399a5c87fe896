//! Turn grouping: compress an ordered entry path into conversational
//! turns.
//!
//! One turn is a user prompt plus the assistant reply it produced,
//! including any tool activity in between. System markers, summaries,
//! progress pings, custom titles, and sidechain entries never contribute
//! to turns, and a user entry whose only content is tool results is part
//! of tool mechanics rather than a new prompt.

use serde_json::Value;

use crate::model::{ContentBlock, Entry, EntryKind, Message, MessageContent};
use crate::util::strip_ansi;

/// What to collect from assistant entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnMode {
    /// Text only.
    #[default]
    Text,
    /// Text plus tool call summaries.
    Tools,
}

/// Parameters for [`group_into_turns`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnOptions {
    /// What to collect from assistant entries.
    pub mode: TurnMode,
    /// Keep turns that originate from post-compaction summary prompts.
    pub include_compact_summaries: bool,
}

/// One tool invocation requested by the assistant.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSummary {
    /// Tool name.
    pub name: String,
    /// Tool input parameters, as given.
    pub input_data: Value,
}

/// One conversational turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Turn {
    /// The user prompt, empty when the turn opened with assistant output.
    pub user_text: String,
    /// Concatenated assistant text.
    pub assistant_text: String,
    /// Tool calls, collected only in [`TurnMode::Tools`].
    pub tool_calls: Vec<ToolSummary>,
    /// Timestamp of the turn's first entry.
    pub timestamp: String,
    /// uuid of the turn's first entry.
    pub uuid: String,
    /// Whether the prompt is a post-compaction summary.
    pub is_compact_summary: bool,
}

impl Turn {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            timestamp: entry.timestamp.clone(),
            uuid: entry.uuid().unwrap_or_default().to_string(),
            is_compact_summary: entry.is_compact_summary(),
            ..Self::default()
        }
    }

    fn has_content(&self) -> bool {
        !self.user_text.is_empty() || !self.assistant_text.is_empty() || !self.tool_calls.is_empty()
    }
}

/// Close the open turn, keeping it when it has content and is not a
/// filtered compaction summary.
fn flush(slot: &mut Option<(Turn, bool)>, turns: &mut Vec<Turn>, include_compact: bool) {
    if let Some((turn, _)) = slot.take() {
        if turn.has_content() && (include_compact || !turn.is_compact_summary) {
            turns.push(turn);
        }
    }
}

/// Group an ordered entry path into turns.
#[must_use]
pub fn group_into_turns(path: &[&Entry], options: &TurnOptions) -> Vec<Turn> {
    let mut turns: Vec<Turn> = Vec::new();
    // The open turn plus whether an assistant entry joined it yet.
    let mut current: Option<(Turn, bool)> = None;

    for entry in path {
        if entry.is_sidechain() {
            continue;
        }
        match entry.kind {
            EntryKind::User => {
                let Some(text) = entry.message.as_ref().and_then(user_text) else {
                    continue;
                };
                // A prompt after a completed reply opens the next turn.
                if matches!(&current, Some((_, true))) {
                    flush(&mut current, &mut turns, options.include_compact_summaries);
                }
                if let Some((turn, _)) = current.as_mut() {
                    // Consecutive prompts merge into one turn.
                    if !turn.user_text.is_empty() && !text.is_empty() {
                        turn.user_text.push('\n');
                    }
                    turn.user_text.push_str(&text);
                } else {
                    let mut turn = Turn::from_entry(entry);
                    turn.user_text = text;
                    current = Some((turn, false));
                }
            }
            EntryKind::Assistant => {
                let Some(message) = &entry.message else {
                    continue;
                };
                let (turn, answered) =
                    current.get_or_insert_with(|| (Turn::from_entry(entry), false));
                *answered = true;
                append_assistant(turn, message, options.mode);
            }
            _ => {}
        }
    }

    flush(&mut current, &mut turns, options.include_compact_summaries);
    turns
}

/// Extract prompt text from a user message, or `None` when the entry does
/// not start or continue a turn (tool results, block lists without text).
fn user_text(message: &Message) -> Option<String> {
    match &message.content {
        MessageContent::Text(s) => Some(strip_ansi(s)),
        MessageContent::Blocks(blocks) => {
            let texts: Vec<&str> = blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::Text(t) => Some(t.text.as_str()),
                    _ => None,
                })
                .collect();
            if texts.is_empty() {
                None
            } else {
                Some(strip_ansi(&texts.join("\n")))
            }
        }
    }
}

/// Fold an assistant message into the open turn.
fn append_assistant(turn: &mut Turn, message: &Message, mode: TurnMode) {
    for block in message.content.blocks() {
        match block {
            ContentBlock::Text(t) => {
                let text = strip_ansi(&t.text);
                if !turn.assistant_text.is_empty() && !text.is_empty() {
                    turn.assistant_text.push('\n');
                }
                turn.assistant_text.push_str(&text);
            }
            ContentBlock::ToolUse(tool) if mode == TurnMode::Tools => {
                turn.tool_calls.push(ToolSummary {
                    name: tool.name.clone(),
                    input_data: tool.input.clone(),
                });
            }
            _ => {}
        }
    }
}
