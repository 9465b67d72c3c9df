//! Launching the user's editor on a list file.

use crate::{Error, Result};
use std::path::Path;
use std::process::Command;

/// The configured editor command, or `NotConfigured` when there is none.
pub fn require_editor(editor: Option<&str>) -> Result<&str> {
    editor.map(str::trim).filter(|e| !e.is_empty()).ok_or_else(|| {
        Error::NotConfigured(
            "no editor configured. Set EDITOR (e.g., export EDITOR=nvim), pass --editor, or run 'todo config set editor <cmd>'"
                .to_string(),
        )
    })
}

/// Open `path` in `editor` and block until the editor exits.
///
/// The editor inherits stdin/stdout/stderr. The command string may carry
/// arguments (`"code --wait"`); it is split on whitespace.
pub fn open_in_editor(editor: Option<&str>, path: &Path) -> Result<()> {
    let editor = require_editor(editor)?;

    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::NotConfigured("editor command is empty".to_string()))?;

    tracing::debug!(editor, path = %path.display(), "launching editor");
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| Error::Other(format!("failed to run editor {}: {}", editor, e)))?;

    if !status.success() {
        return Err(Error::Other(format!(
            "editor {} exited with {}",
            editor, status
        )));
    }

    Ok(())
}
