//! `recap tree`: show branch points and their alternatives.

use console::style;

use crate::error::Result;

use super::CommandContext;

/// Print the session's real branch points with selectable alternatives.
pub fn run(context: &CommandContext, selector: Option<&str>) -> Result<()> {
    let session = context.load_session(selector)?;
    let points = session.branch_points();

    if points.is_empty() {
        println!(
            "No branches in {}; the conversation is linear.",
            session.session_id()
        );
        return Ok(());
    }

    println!("Branch points in {}:", session.session_id());
    for (i, point) in points.iter().enumerate() {
        println!(
            "\nBranch point {} (at {}):",
            i + 1,
            style(&point.parent_uuid).dim()
        );
        for (n, child) in point.children.iter().enumerate() {
            let marker = if child.is_active { "*" } else { " " };
            println!(
                "  {marker} {}. {}",
                n + 1,
                if child.is_active {
                    style(child.preview.as_str()).bold().to_string()
                } else {
                    child.preview.clone()
                }
            );
        }
    }
    println!("\nUse `recap view --branch N` to follow an alternative.");

    Ok(())
}
