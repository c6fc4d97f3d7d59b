use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting store files.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create the file (and its parents) if missing, then read it to a string.
/// A fresh store file therefore reads back as the empty string.
pub fn touch_read(path: &Path) -> Result<String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(std::fs::read_to_string(path)?)
}

/// Prompt on stderr (stdout stays clean for pipelines) and read one line
/// from stdin, trimmed.
pub fn read_line(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Ask `Confirm? [Y/n]` (or `[y/N]`) until the answer parses.
/// Empty input takes the default; a failed read counts as no.
pub fn confirm(default: bool) -> bool {
    let hint = if default { "Y/n" } else { "y/N" };
    loop {
        let Ok(answer) = read_line(&format!("Confirm? [{hint}] ")) else {
            return false;
        };
        match answer.to_lowercase().as_str() {
            "" => return default,
            "y" | "yes" => return true,
            "n" | "no" => return false,
            _ => (),
        }
    }
}
