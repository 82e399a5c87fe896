//! Configuration for display defaults.
//!
//! Settings load from `~/.config/recap/config.toml` when present and are
//! overridden by command-line flags. Every field has a default, so a
//! missing file is not an error.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{RecapError, Result};
use crate::util::DEFAULT_TURNS;

/// Display defaults, overridable from the command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default truncation length for tool/thinking content in raw view.
    pub truncate: i64,
    /// Default number of turns shown by view/copy.
    pub turns: usize,
    /// Force colored output on or off; unset auto-detects.
    pub color: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            truncate: 500,
            turns: DEFAULT_TURNS,
            color: None,
        }
    }
}

impl Config {
    /// Load the configuration from the default location, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load the configuration from an explicit file.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RecapError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| RecapError::config(format!("cannot parse {}: {e}", path.display())))
    }

    /// The default config file path (`~/.config/recap/config.toml`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("recap").join("config.toml"))
    }
}
