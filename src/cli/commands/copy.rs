//! `recap copy`: send rendered turns to the clipboard.

use crate::cli::CopyArgs;
use crate::clipboard::copy_to_clipboard;
use crate::error::Result;
use crate::extract::extract_raw_messages;
use crate::format::{format_raw_message, format_turn, FormatOptions};
use crate::session::PathOptions;
use crate::util::compute_indices;

use super::{session_turns, CommandContext};

/// Copy the selected turns (default: the last one) to the clipboard.
pub fn run(context: &CommandContext, args: &CopyArgs) -> Result<()> {
    let session = context.load_session(args.session.as_deref())?;
    // Clipboard text is always plain.
    let options = FormatOptions {
        show_tools: args.tools,
        ..FormatOptions::default()
    };
    let range = args.range.as_deref().or(Some("-1").filter(|_| args.n.is_none()));

    let (text, copied) = if args.raw {
        let path = session.active_path_with(PathOptions {
            branch: args.branch,
            stitch: true,
        })?;
        let messages = extract_raw_messages(&path, context.config.truncate);
        let indices = compute_indices(messages.len(), args.n, range, false);
        let blocks: Vec<String> = indices
            .iter()
            .map(|&i| format_raw_message(&messages[i - 1], i, messages.len(), &options))
            .collect();
        (blocks.join("\n"), indices.len())
    } else {
        let turns = session_turns(&session, args.branch, true, args.tools, false)?;
        let indices = compute_indices(turns.len(), args.n, range, false);
        let blocks: Vec<String> = indices
            .iter()
            .map(|&i| format_turn(&turns[i - 1], i, turns.len(), &options))
            .collect();
        (blocks.join("\n"), indices.len())
    };

    copy_to_clipboard(&text)?;
    eprintln!("Copied {copied} item(s) from {} to clipboard", session.session_id());
    Ok(())
}
