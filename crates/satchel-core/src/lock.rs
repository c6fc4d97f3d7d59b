use crate::error::{Result, SatchelError};
use std::path::PathBuf;

/// Advisory per-tool run lock: a directory in the system temp dir.
///
/// `create_dir` either creates or fails, so whichever process creates the
/// directory owns the run; everyone else fails fast instead of clobbering
/// the store. Dropping the guard releases the lock. A crash can leave the
/// directory behind — the error message names the path so it can be
/// removed by hand.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(tool: &str) -> Result<RunLock> {
        let path = std::env::temp_dir().join(format!("{tool}.lock"));
        match std::fs::create_dir(&path) {
            Ok(()) => Ok(RunLock { path }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Err(SatchelError::Locked {
                tool: tool.to_string(),
                path,
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir(&self.path);
    }
}
