//! `recap export`: dump a whole conversation.

use crate::cli::ExportArgs;
use crate::error::{RecapError, Result};
use crate::extract::extract_raw_messages;
use crate::format::{format_raw_json, format_raw_message, format_turn, format_turns_json, FormatOptions};
use crate::session::PathOptions;

use super::{session_turns, CommandContext};

/// Export the full active conversation as text or JSON.
pub fn run(context: &CommandContext, args: &ExportArgs) -> Result<()> {
    let session = context.load_session(args.session.as_deref())?;
    // Export output is for files and pipes, so never colored.
    let options = FormatOptions {
        show_tools: true,
        show_timestamp: true,
        color: false,
    };

    let output = if args.raw {
        let path = session.active_path_with(PathOptions::default())?;
        let messages = extract_raw_messages(&path, -1);
        if args.json {
            format_raw_json(&messages, session.session_id())
        } else {
            messages
                .iter()
                .enumerate()
                .map(|(i, m)| format_raw_message(m, i + 1, messages.len(), &options))
                .collect::<Vec<_>>()
                .join("\n")
        }
    } else {
        let turns = session_turns(&session, 0, true, true, true)?;
        if args.json {
            let refs: Vec<_> = turns.iter().collect();
            format_turns_json(&refs, session.session_id(), turns.len(), 1)
        } else {
            turns
                .iter()
                .enumerate()
                .map(|(i, t)| format_turn(t, i + 1, turns.len(), &options))
                .collect::<Vec<_>>()
                .join("\n")
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, output).map_err(|e| {
                RecapError::io(format!("Failed to write {}", path.display()), e)
            })?;
            eprintln!("Exported {} to {}", session.session_id(), path.display());
        }
        None => println!("{output}"),
    }

    Ok(())
}
