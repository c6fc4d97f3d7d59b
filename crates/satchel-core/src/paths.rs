use crate::error::{Result, SatchelError};
use std::ffi::OsString;
use std::path::PathBuf;

/// Resolve the store file for a tool.
///
/// An explicit path (from a `--path` flag or the tool's env var, which clap
/// binds to the same option) wins. An empty explicit path counts as unset so
/// that `BKMK_FILE= bkmk ...` behaves like an unset variable. Otherwise the
/// store lives at `<data dir>/<tool>`.
pub fn data_file(tool: &str, explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.as_os_str().is_empty() {
            return Ok(path);
        }
    }
    Ok(data_dir()?.join(tool))
}

/// `$XDG_DATA_HOME` if set and non-empty, else `~/.local/share`.
pub fn data_dir() -> Result<PathBuf> {
    data_dir_from(std::env::var_os("XDG_DATA_HOME"), home::home_dir())
}

fn data_dir_from(xdg: Option<OsString>, home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = xdg {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = home.ok_or(SatchelError::HomeNotFound)?;
    Ok(home.join(".local").join("share"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_dir_wins_when_set() {
        let dir = data_dir_from(
            Some(OsString::from("/xdg/data")),
            Some(PathBuf::from("/home/u")),
        )
        .unwrap();
        assert_eq!(dir, PathBuf::from("/xdg/data"));
    }

    #[test]
    fn empty_xdg_dir_falls_back_to_home() {
        let dir = data_dir_from(Some(OsString::new()), Some(PathBuf::from("/home/u"))).unwrap();
        assert_eq!(dir, PathBuf::from("/home/u/.local/share"));
    }

    #[test]
    fn no_home_is_an_error() {
        assert!(data_dir_from(None, None).is_err());
    }

    #[test]
    fn explicit_path_wins() {
        let path = data_file("bkmk", Some(PathBuf::from("/tmp/marks"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/marks"));
    }

    #[test]
    fn empty_explicit_path_counts_as_unset() {
        // Falls through to the data dir; just check the file name survived.
        if let Ok(path) = data_file("bkmk", Some(PathBuf::new())) {
            assert!(path.ends_with("bkmk"));
        }
    }
}
