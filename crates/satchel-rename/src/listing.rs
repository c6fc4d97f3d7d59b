//! The editable listing: what goes into the editor and how the saved
//! result maps back onto the original files.

use std::path::PathBuf;

use anyhow::{bail, Result};

/// Instructional header. Only full-line comments are recognized, so a
/// `#` later in a path never eats the rest of the line.
const HEADER: &[&str] = &[
    "# Edit the paths below, then save and quit to apply the renames.",
    "# Only lines that start with # are comments.",
    "# Lines with a # after the first character are not comments.",
];

/// Render the files as an editable listing. With `prefix`, every line is
/// `N<TAB>path` and the numbers tie lines back to files even after
/// reordering; without it, line order is the only tie.
pub fn build(files: &[PathBuf], prefix: bool) -> String {
    let mut lines: Vec<String> = HEADER.iter().map(|line| line.to_string()).collect();
    for (i, file) in files.iter().enumerate() {
        if prefix {
            lines.push(format!("{i}\t{}", file.display()));
        } else {
            lines.push(file.display().to_string());
        }
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Map the edited listing back to `(original index, new path)` pairs.
///
/// Blank lines and `#` comments are dropped first. Every original file
/// must come back exactly once: a missing, unknown, or duplicate number
/// prefix is an error, as is a line-count mismatch in either mode.
pub fn parse(text: &str, expected: usize, prefix: bool) -> Result<Vec<(usize, String)>> {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .collect();

    if lines.len() != expected {
        bail!(
            "listing has {} entries but {} files were offered; deleting or adding lines is not supported",
            lines.len(),
            expected
        );
    }

    if !prefix {
        return Ok(lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| (i, line.to_string()))
            .collect());
    }

    let mut seen = vec![false; expected];
    let mut entries = Vec::with_capacity(expected);
    for line in lines {
        let Some((digits, path)) = line.split_once('\t') else {
            bail!("line has no number prefix: {line:?}");
        };
        let Ok(index) = digits.trim().parse::<usize>() else {
            bail!("line has an unreadable number prefix: {line:?}");
        };
        if index >= expected {
            bail!("unknown prefix {index} (only {expected} files were offered)");
        }
        if seen[index] {
            bail!("duplicate prefix {index}");
        }
        seen[index] = true;
        entries.push((index, path.to_string()));
    }
    Ok(entries)
}
