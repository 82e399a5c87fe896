//! CLI command implementations.
//!
//! Each command lives in its own module with a `run` function; shared
//! session-loading plumbing lives here.

pub mod copy;
pub mod export;
pub mod list;
pub mod search;
pub mod tree;
pub mod view;

use std::path::PathBuf;

use crate::config::Config;
use crate::discovery::ProjectResolver;
use crate::error::Result;
use crate::extract::{group_into_turns, Turn, TurnMode, TurnOptions};
use crate::format::FormatOptions;
use crate::index::resolve_session;
use crate::session::{PathOptions, Session};

/// Shared state handed to every command.
#[derive(Debug)]
pub struct CommandContext {
    /// Project directory resolver.
    pub resolver: ProjectResolver,
    /// Loaded configuration.
    pub config: Config,
    /// Project override from the command line.
    pub project: Option<String>,
}

impl CommandContext {
    /// The project directory to operate on.
    pub fn project_dir(&self) -> Result<PathBuf> {
        self.resolver.resolve(self.project.as_deref())
    }

    /// Resolve a session selector and load the transcript.
    pub fn load_session(&self, selector: Option<&str>) -> Result<Session> {
        let project_dir = self.project_dir()?;
        let path = resolve_session(&project_dir, selector)?;
        Session::load(path)
    }

    /// Display options with color auto-detection applied.
    #[must_use]
    pub fn format_options(&self, show_tools: bool, show_timestamp: bool) -> FormatOptions {
        FormatOptions {
            show_tools,
            show_timestamp,
            color: self
                .config
                .color
                .unwrap_or_else(|| console::Term::stdout().features().colors_supported()),
        }
    }
}

/// Build the turns of a session's active path.
pub(crate) fn session_turns(
    session: &Session,
    branch: usize,
    stitch: bool,
    tools: bool,
    include_compact_summaries: bool,
) -> Result<Vec<Turn>> {
    let path = session.active_path_with(PathOptions { branch, stitch })?;
    let options = TurnOptions {
        mode: if tools { TurnMode::Tools } else { TurnMode::Text },
        include_compact_summaries,
    };
    Ok(group_into_turns(&path, &options))
}
