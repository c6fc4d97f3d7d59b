use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SatchelError {
    #[error("no editor found: install one of nvim, vim, vi, or nano")]
    NoEditor,

    /// The user backed out (closed the picker, quit the editor with a
    /// non-zero status, answered no). Callers exit 1 without printing.
    #[error("cancelled")]
    Cancelled,

    #[error("picker '{0}' not found on PATH")]
    PickerNotFound(String),

    #[error("invalid selection '{input}': {reason}")]
    InvalidRange { input: String, reason: String },

    #[error("another {tool} run seems to be active (lock: {path})")]
    Locked { tool: String, path: PathBuf },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SatchelError {
    /// True for errors that already reached the user through the
    /// interaction itself, so no message should be printed on exit.
    pub fn is_silent(&self) -> bool {
        matches!(self, SatchelError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, SatchelError>;
