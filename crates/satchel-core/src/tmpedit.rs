//! Round-trip a piece of text through the user's editor.
//!
//! Several tools let the user edit something in place: bookmark titles,
//! item names, rename listings. The text goes into a temp file, the
//! editor runs on it with the caller's terminal, and whatever was saved
//! comes back.

use std::io::Write;
use std::process::Command;

use tempfile::Builder;

use crate::error::{Result, SatchelError};

/// Editor used for text round trips: `$EDITOR`, else the suite's own
/// `edit` helper, which in turn picks whatever is installed.
pub fn editor_command() -> String {
    editor_from(std::env::var("EDITOR").ok())
}

fn editor_from(var: Option<String>) -> String {
    match var {
        Some(editor) if !editor.trim().is_empty() => editor,
        _ => "edit".to_string(),
    }
}

/// Write `text` to a temp file, open it in the editor, read it back.
///
/// The extension drives the editor's filetype detection. A non-zero
/// editor exit means the user backed out, and counts as a cancel. The
/// file is read back by path because editors routinely replace the file
/// rather than write through the original inode.
pub fn edit_text(text: &str, extension: Option<&str>) -> Result<String> {
    let suffix = extension.map(|ext| format!(".{ext}"));
    let mut builder = Builder::new();
    builder.prefix("satchel.");
    if let Some(suffix) = suffix.as_deref() {
        builder.suffix(suffix);
    }

    let mut file = builder.tempfile()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;

    let status = Command::new(editor_command()).arg(file.path()).status()?;
    if !status.success() {
        return Err(SatchelError::Cancelled);
    }

    Ok(std::fs::read_to_string(file.path())?)
}
