//! Command-line interface for claude-recap.
//!
//! Provides scriptable access to the active conversation of Claude Code
//! sessions with six commands:
//! - `list`: recent sessions in the current project
//! - `view`: display the active conversation
//! - `copy`: send rendered turns to the clipboard
//! - `search`: regex search over conversation turns
//! - `tree`: show branch points and alternatives
//! - `export`: dump a whole conversation as text or JSON

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::discovery::ProjectResolver;
use crate::error::Result;

/// View Claude Code conversations from the terminal.
#[derive(Debug, Parser)]
#[command(name = "recap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Project override: encoded key (these start with `-`), partial
    /// key, or a real path.
    #[arg(short = 'p', long, global = true, allow_hyphen_values = true)]
    pub project: Option<String>,

    /// Log level filter (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "RECAP_LOG")]
    pub log_level: String,

    /// Path to a custom configuration file.
    #[arg(long, global = true, env = "RECAP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List recent sessions in the project.
    #[command(visible_alias = "ls")]
    List {
        /// Number of sessions to show.
        #[arg(short = 'c', long, default_value_t = 10)]
        count: usize,
    },

    /// View the active conversation of a session.
    #[command(visible_alias = "v")]
    View(SelectionArgs),

    /// Copy rendered turns to the clipboard.
    #[command(visible_alias = "cp")]
    Copy(CopyArgs),

    /// Search conversation turns across sessions.
    #[command(visible_alias = "s")]
    Search {
        /// Regular expression to look for.
        pattern: String,

        /// Maximum number of matches to print.
        #[arg(short = 'l', long, default_value_t = 20)]
        limit: usize,
    },

    /// Show branch points of a session.
    #[command(visible_alias = "t")]
    Tree {
        /// Session selector (index, ID prefix; latest when omitted).
        session: Option<String>,
    },

    /// Export a whole conversation.
    #[command(visible_alias = "e")]
    Export(ExportArgs),
}

/// Selection and display flags shared by view.
#[derive(Debug, clap::Args)]
pub struct SelectionArgs {
    /// Session selector (index, ID prefix; latest when omitted).
    pub session: Option<String>,

    /// Show the last N turns.
    #[arg(short = 'n')]
    pub n: Option<usize>,

    /// Show a turn range, e.g. `3-5`, `-1`, `-3--1`.
    #[arg(short = 'r', allow_hyphen_values = true)]
    pub range: Option<String>,

    /// Show every turn.
    #[arg(long)]
    pub all: bool,

    /// Show tool call summaries.
    #[arg(long)]
    pub tools: bool,

    /// Show raw sub-block records instead of turns.
    #[arg(long)]
    pub raw: bool,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Do not stitch across compaction boundaries.
    #[arg(long)]
    pub no_stitch: bool,

    /// Show timestamps in headers.
    #[arg(long)]
    pub timestamps: bool,

    /// Include post-compaction summary turns.
    #[arg(long)]
    pub compact_summaries: bool,

    /// Truncate tool/thinking content in raw view (-1 disables).
    #[arg(long, allow_hyphen_values = true)]
    pub truncate: Option<i64>,

    /// Follow the Nth alternative at the first branch point.
    #[arg(short = 'b', long, default_value_t = 0)]
    pub branch: usize,
}

/// Flags for the copy command.
#[derive(Debug, clap::Args)]
pub struct CopyArgs {
    /// Session selector (index, ID prefix; latest when omitted).
    pub session: Option<String>,

    /// Copy the last N turns.
    #[arg(short = 'n')]
    pub n: Option<usize>,

    /// Copy a turn range (defaults to the last turn).
    #[arg(short = 'r', allow_hyphen_values = true)]
    pub range: Option<String>,

    /// Include tool call summaries.
    #[arg(long)]
    pub tools: bool,

    /// Copy raw sub-block records instead of turns.
    #[arg(long)]
    pub raw: bool,

    /// Follow the Nth alternative at the first branch point.
    #[arg(short = 'b', long, default_value_t = 0)]
    pub branch: usize,
}

/// Flags for the export command.
#[derive(Debug, clap::Args)]
pub struct ExportArgs {
    /// Session selector (index, ID prefix; latest when omitted).
    pub session: Option<String>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Export raw sub-block records instead of turns.
    #[arg(long)]
    pub raw: bool,

    /// Write to a file instead of stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Parse arguments, initialize logging, and dispatch.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let context = commands::CommandContext {
        resolver: ProjectResolver::discover()?,
        config,
        project: cli.project.clone(),
    };

    match cli.command {
        Commands::List { count } => commands::list::run(&context, count),
        Commands::View(args) => commands::view::run(&context, &args),
        Commands::Copy(args) => commands::copy::run(&context, &args),
        Commands::Search { pattern, limit } => commands::search::run(&context, &pattern, limit),
        Commands::Tree { session } => commands::tree::run(&context, session.as_deref()),
        Commands::Export(args) => commands::export::run(&context, &args),
    }
}

/// Initialize the tracing subscriber from the CLI log level, letting
/// `RECAP_LOG` style directives override it.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
