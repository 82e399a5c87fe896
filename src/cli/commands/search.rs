//! `recap search`: regex search over conversation turns.

use console::style;
use regex::RegexBuilder;

use crate::error::{RecapError, Result};
use crate::index::SessionIndex;
use crate::session::Session;
use crate::util::truncate;

use super::{session_turns, CommandContext};

/// Width of match previews.
const PREVIEW_LEN: usize = 80;

/// Sessions scanned at most, newest first.
const SCAN_LIMIT: usize = 100;

/// Search turn text across the project's sessions, newest first.
pub fn run(context: &CommandContext, pattern: &str, limit: usize) -> Result<()> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| RecapError::InvalidArgument {
            name: "pattern".to_string(),
            reason: e.to_string(),
        })?;

    let project_dir = context.project_dir()?;
    let index = SessionIndex::new(&project_dir);
    let mut printed = 0usize;

    for meta in index.list_sessions(SCAN_LIMIT)? {
        if printed >= limit {
            break;
        }
        let Ok(session) = Session::load(&meta.path) else {
            continue;
        };
        let turns = session_turns(&session, 0, true, false, false)?;
        for (i, turn) in turns.iter().enumerate() {
            if printed >= limit {
                break;
            }
            let haystack = [turn.user_text.as_str(), turn.assistant_text.as_str()];
            let Some(matched) = haystack.into_iter().find(|text| regex.is_match(text)) else {
                continue;
            };
            let line = matched
                .lines()
                .find(|l| regex.is_match(l))
                .unwrap_or(matched);
            println!(
                "{} {} {}",
                style(&meta.session_id).cyan(),
                style(format!("[turn {}/{}]", i + 1, turns.len())).dim(),
                truncate(line.trim(), PREVIEW_LEN),
            );
            printed += 1;
        }
    }

    if printed == 0 {
        println!("No matches for '{pattern}'");
    }
    Ok(())
}
