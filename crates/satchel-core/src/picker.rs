//! Selection through an external fuzzy picker.
//!
//! Candidate lines go to the picker's stdin, the chosen line comes back
//! on its stdout, and the picker draws its interface on the controlling
//! terminal. fzf works this way out of the box; `$PICKER` swaps in any
//! other tool with the same contract.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{Result, SatchelError};

/// `$PICKER` if set and non-empty, else fzf.
pub fn picker_command() -> String {
    match std::env::var("PICKER") {
        Ok(picker) if !picker.trim().is_empty() => picker,
        _ => "fzf".to_string(),
    }
}

/// Offer `lines` in the picker and return the chosen line.
///
/// A non-zero picker exit means the user closed it without choosing,
/// which counts as a cancel.
pub fn pick<I>(prompt: &str, lines: I) -> Result<String>
where
    I: IntoIterator<Item = String>,
{
    let picker = picker_command();
    if which::which(&picker).is_err() {
        return Err(SatchelError::PickerNotFound(picker));
    }

    let mut child = Command::new(&picker)
        .arg("--prompt")
        .arg(prompt)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    if let Some(stdin) = child.stdin.as_mut() {
        for line in lines {
            if let Err(e) = writeln!(stdin, "{line}") {
                if e.kind() == std::io::ErrorKind::BrokenPipe {
                    // Picker made its choice (or quit) before reading
                    // everything; its exit status decides below.
                    break;
                }
                return Err(e.into());
            }
        }
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(SatchelError::Cancelled);
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .trim_end_matches('\n')
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // PICKER is process-global state, so all the env-driven paths share
    // one sequential test.
    #[cfg(unix)]
    #[test]
    fn picker_subprocess_contract() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::TempDir::new().unwrap();

        let script = |name: &str, body: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        };
        let chooser = script("chooser", "head -n 1");
        let canceller = script("canceller", "cat > /dev/null\nexit 130");

        let lines = vec!["0 first".to_string(), "1 second".to_string()];

        std::env::set_var("PICKER", "satchel-no-such-picker");
        match pick("pick: ", lines.clone()).unwrap_err() {
            SatchelError::PickerNotFound(name) => assert_eq!(name, "satchel-no-such-picker"),
            other => panic!("expected PickerNotFound, got {other:?}"),
        }

        std::env::set_var("PICKER", &chooser);
        assert_eq!(pick("pick: ", lines.clone()).unwrap(), "0 first");

        std::env::set_var("PICKER", &canceller);
        let err = pick("pick: ", lines).unwrap_err();
        assert!(matches!(err, SatchelError::Cancelled));

        std::env::remove_var("PICKER");
    }
}
