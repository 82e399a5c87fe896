//! `recap list`: recent sessions in the current project.

use chrono::{DateTime, Local};
use console::style;

use crate::error::Result;
use crate::index::SessionIndex;
use crate::util::truncate;

use super::CommandContext;

/// Width of the headline column.
const HEADLINE_LEN: usize = 60;

/// List the project's most recent sessions.
pub fn run(context: &CommandContext, count: usize) -> Result<()> {
    let project_dir = context.project_dir()?;
    let index = SessionIndex::new(&project_dir);
    let sessions = index.list_sessions(count)?;

    if sessions.is_empty() {
        println!("No sessions found in {}", project_dir.display());
        return Ok(());
    }

    println!("Sessions in {}:", project_dir.display());
    for (i, meta) in sessions.iter().enumerate() {
        let modified: DateTime<Local> = meta.modified.into();
        let headline = meta
            .summary
            .as_deref()
            .or(meta.first_prompt.as_deref())
            .unwrap_or("(no prompt)");
        println!(
            "{:>3}. {}  {}  {:>4} msgs  {}",
            i + 1,
            style(&meta.session_id).cyan(),
            style(modified.format("%Y-%m-%d %H:%M")).dim(),
            meta.message_count,
            truncate(headline, HEADLINE_LEN),
        );
    }

    Ok(())
}
