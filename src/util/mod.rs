//! Shared text and index utilities.
//!
//! Small pure helpers used across the crate: ANSI stripping, character
//! truncation, tolerant timestamp parsing, path shortening for tool
//! summaries, and the 1-based index selection used by the view/copy
//! commands.

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;

/// Number of turns shown by default when no selection is given.
pub const DEFAULT_TURNS: usize = 5;

/// Matches `ESC [ params letter` terminal control sequences.
static ANSI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("static regex is valid"));

/// Matches a 1-based index or range, either end possibly negative.
static RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d+)(?:-(-?\d+))?$").expect("static regex is valid"));

/// Remove ANSI escape sequences from a string.
///
/// Transcript content that originated as terminal output may carry color
/// and cursor codes; everything else is preserved verbatim.
#[must_use]
pub fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

/// Truncate a string to `max_len` characters, appending `"..."` when
/// anything was cut. `max_len == 0` disables truncation.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 || s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_len).collect();
    out.push_str("...");
    out
}

/// Parse an ISO-8601 timestamp, tolerating `Z` suffixes and offsets.
/// Empty or unparseable input yields `None`.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(s).ok()
}

/// Shorten a path to its last `max_parts` components, prefixing `".../"`
/// when anything was dropped. The root `/` counts as a component.
#[must_use]
pub fn short_path(path: &str, max_parts: usize) -> String {
    let is_absolute = path.starts_with('/');
    let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
    let total = components.len() + usize::from(is_absolute);
    if max_parts == 0 || total <= max_parts {
        return path.to_string();
    }
    let keep = max_parts.min(components.len());
    format!(".../{}", components[components.len() - keep..].join("/"))
}

/// Parse an index or range specification into 1-based indices.
///
/// Accepts `"3"`, `"-1"` (last), `"3-5"`, `"-3--1"`, and mixed forms like
/// `"-2-10"`. Negative values count from the end (`-1` is `max_val`).
/// Results are clipped to `[1, max_val]`; invalid input yields an empty
/// list.
#[must_use]
pub fn parse_range(spec: &str, max_val: usize) -> Vec<usize> {
    let Some(captures) = RANGE_RE.captures(spec) else {
        return Vec::new();
    };
    let resolve = |v: i64| -> i64 {
        if v < 0 {
            max_val as i64 + 1 + v
        } else {
            v
        }
    };

    let Some(start) = captures.get(1).and_then(|m| m.as_str().parse::<i64>().ok()) else {
        return Vec::new();
    };
    let start = resolve(start);

    match captures.get(2) {
        None => {
            if start >= 1 && start <= max_val as i64 {
                vec![start as usize]
            } else {
                Vec::new()
            }
        }
        Some(end) => {
            let Ok(end) = end.as_str().parse::<i64>() else {
                return Vec::new();
            };
            let end = resolve(end).min(max_val as i64);
            let start = start.max(1);
            if start > end {
                return Vec::new();
            }
            (start..=end).map(|i| i as usize).collect()
        }
    }
}

/// Compute the 1-based turn indices to display.
///
/// Priority: `show_all`, then an explicit `range`, then the last `n`,
/// then the last [`DEFAULT_TURNS`].
#[must_use]
pub fn compute_indices(
    total: usize,
    n: Option<usize>,
    range: Option<&str>,
    show_all: bool,
) -> Vec<usize> {
    if show_all {
        return (1..=total).collect();
    }
    if let Some(range) = range {
        return parse_range(range, total);
    }
    let count = n.unwrap_or(DEFAULT_TURNS);
    let start = if count >= total { 1 } else { total - count + 1 };
    (start..=total).collect()
}
