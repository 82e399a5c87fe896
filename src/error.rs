//! Error types for claude-recap.
//!
//! This module provides the crate-wide error enum following the thiserror
//! pattern. Variants are designed for both programmatic matching (the core
//! surfaces `NotFound`, `Io`, and `BranchOutOfRange`) and user-facing
//! display from the CLI binary.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for claude-recap operations.
#[derive(Error, Debug)]
pub enum RecapError {
    /// Session file not found.
    #[error("File not found: {path}")]
    NotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    Io {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Requested branch index does not exist at the branch point.
    #[error("Branch {requested} is out of range ({available} available)")]
    BranchOutOfRange {
        /// The 1-based branch index the caller asked for.
        requested: usize,
        /// Number of selectable branches.
        available: usize,
    },

    /// No project directory matches the current directory or override.
    #[error("No Claude project found for {hint}")]
    ProjectNotFound {
        /// The path or override string that failed to resolve.
        hint: String,
    },

    /// Session selector matched nothing.
    #[error("Session not found: {selector}")]
    SessionNotFound {
        /// The selector (index, uuid prefix, or filename) that failed.
        selector: String,
    },

    /// Claude data directory could not be located.
    #[error("Claude Code data directory not found. Expected at: {expected_path}")]
    ClaudeDirectoryNotFound {
        /// Expected path to the Claude Code data directory.
        expected_path: PathBuf,
    },

    /// Clipboard hand-off failed.
    #[error("Clipboard error: {message}")]
    Clipboard {
        /// Human-readable error message.
        message: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid command-line argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    Serialization {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },
}

impl RecapError {
    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a new clipboard error.
    #[must_use]
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. }
            | Self::SessionNotFound { .. }
            | Self::ProjectNotFound { .. }
            | Self::ClaudeDirectoryNotFound { .. } => 3,
            Self::BranchOutOfRange { .. } | Self::InvalidArgument { .. } => 64,
            Self::Config { .. } => 5,
            Self::Io { .. } => 74,
            _ => 1,
        }
    }
}

/// Result type alias for claude-recap operations.
pub type Result<T> = std::result::Result<T, RecapError>;

impl From<std::io::Error> for RecapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for RecapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// Operation completed successfully.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// Specified file, session, or project not found.
    pub const EXIT_NOT_FOUND: i32 = 3;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}
