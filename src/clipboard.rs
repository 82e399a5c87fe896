//! Clipboard hand-off for the copy command.

use crate::error::{RecapError, Result};

/// Place text on the system clipboard.
///
/// Fails with [`RecapError::Clipboard`] when no clipboard is available
/// (e.g. headless sessions); callers decide whether that is fatal.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| RecapError::clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| RecapError::clipboard(e.to_string()))
}
