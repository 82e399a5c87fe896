//! `recap view`: display the active conversation of a session.

use crate::cli::SelectionArgs;
use crate::error::Result;
use crate::extract::extract_raw_messages;
use crate::format::{format_raw_json, format_raw_message, format_turn, format_turns_json};
use crate::session::PathOptions;
use crate::util::compute_indices;

use super::{session_turns, CommandContext};

/// Render a session's active conversation to stdout.
pub fn run(context: &CommandContext, args: &SelectionArgs) -> Result<()> {
    let session = context.load_session(args.session.as_deref())?;
    let options = context.format_options(args.tools, args.timestamps);

    if args.raw {
        let path = session.active_path_with(PathOptions {
            branch: args.branch,
            stitch: !args.no_stitch,
        })?;
        let truncate_len = args.truncate.unwrap_or(context.config.truncate);
        let messages = extract_raw_messages(&path, truncate_len);

        if args.json {
            println!("{}", format_raw_json(&messages, session.session_id()));
            return Ok(());
        }
        let indices = compute_indices(messages.len(), args.n, args.range.as_deref(), args.all);
        for index in indices {
            println!(
                "{}",
                format_raw_message(&messages[index - 1], index, messages.len(), &options)
            );
        }
        return Ok(());
    }

    let turns = session_turns(
        &session,
        args.branch,
        !args.no_stitch,
        args.tools,
        args.compact_summaries,
    )?;
    let indices = compute_indices(turns.len(), args.n, args.range.as_deref(), args.all);

    if args.json {
        let selected: Vec<_> = indices.iter().map(|&i| &turns[i - 1]).collect();
        let start = indices.first().copied().unwrap_or(1);
        println!(
            "{}",
            format_turns_json(&selected, session.session_id(), turns.len(), start)
        );
        return Ok(());
    }

    if turns.is_empty() {
        println!("No conversation turns in {}", session.session_id());
        return Ok(());
    }
    for index in indices {
        println!("{}", format_turn(&turns[index - 1], index, turns.len(), &options));
    }

    Ok(())
}
