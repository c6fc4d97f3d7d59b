//! Editor discovery and launch planning for the `edit` helper.
//!
//! Candidates are probed on `PATH` in a fixed preference order and the
//! first hit wins. When the calling process has no terminal on stdout or
//! stderr (a GUI file manager, a hotkey daemon), the editor is wrapped in
//! a terminal emulator so it has a screen to draw on; otherwise it runs
//! in the terminal that is already there.
//!
//! # Preference order
//! 1. nvim — modern modal editor
//! 2. vim  — classic modal editor
//! 3. vi   — minimal, present on effectively every system
//! 4. nano — friendliest fallback

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::Command;

use crate::error::{Result, SatchelError};

/// Editors in preference order. First one found on the search path wins.
pub const CANDIDATES: [&str; 4] = ["nvim", "vim", "vi", "nano"];

/// Terminal emulator used when no TTY is attached; `$TERMINAL` overrides.
pub const DEFAULT_TERMINAL: &str = "xterm";

/// Find the preferred editor on the ambient `PATH`.
pub fn find_editor() -> Result<PathBuf> {
    find_editor_in(std::env::var_os("PATH").as_deref())
}

/// Probe the candidates against an explicit search path, in order.
pub fn find_editor_in(search_path: Option<&OsStr>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    for candidate in CANDIDATES {
        if let Ok(found) = which::which_in(candidate, search_path, &cwd) {
            return Ok(found);
        }
    }
    Err(SatchelError::NoEditor)
}

/// `$TERMINAL` if set and non-empty, else the stock fallback.
pub fn terminal_emulator() -> String {
    match std::env::var("TERMINAL") {
        Ok(term) if !term.trim().is_empty() => term,
        _ => DEFAULT_TERMINAL.to_string(),
    }
}

/// How the editor should be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    /// Run the editor straight in the terminal we already have.
    Direct { editor: PathBuf },
    /// No usable TTY: run a terminal emulator that runs the editor.
    Terminal { terminal: String, editor: PathBuf },
}

impl Launch {
    /// Decide the launch mode. `tty` is whether stdout or stderr is
    /// attached to a terminal.
    pub fn decide(tty: bool, editor: PathBuf, terminal: String) -> Launch {
        if tty {
            Launch::Direct { editor }
        } else {
            Launch::Terminal { terminal, editor }
        }
    }

    /// Build the process to become, forwarding `args` untouched.
    ///
    /// The wrapped form follows the `-e` convention (`xterm -e prog
    /// args...`) that every mainstream emulator accepts: the editor and
    /// its arguments ride along as sub-arguments of the emulator.
    pub fn command(&self, args: &[OsString]) -> Command {
        match self {
            Launch::Direct { editor } => {
                let mut cmd = Command::new(editor);
                cmd.args(args);
                cmd
            }
            Launch::Terminal { terminal, editor } => {
                let mut cmd = Command::new(terminal);
                cmd.arg("-e");
                cmd.arg(editor);
                cmd.args(args);
                cmd
            }
        }
    }
}

/// Replace the current process with `cmd`. Only returns on failure.
#[cfg(unix)]
pub fn exec(mut cmd: Command) -> std::io::Error {
    use std::os::unix::process::CommandExt;
    cmd.exec()
}

/// Non-Unix fallback: run the command and exit with its status.
#[cfg(not(unix))]
pub fn exec(mut cmd: Command) -> std::io::Error {
    match cmd.status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_order_is_stable() {
        assert_eq!(CANDIDATES, ["nvim", "vim", "vi", "nano"]);
    }

    #[test]
    fn tty_means_direct_launch() {
        let plan = Launch::decide(true, PathBuf::from("/usr/bin/vi"), "xterm".into());
        assert_eq!(
            plan,
            Launch::Direct {
                editor: PathBuf::from("/usr/bin/vi")
            }
        );
    }

    #[test]
    fn no_tty_means_terminal_wrap() {
        let plan = Launch::decide(false, PathBuf::from("/usr/bin/vi"), "foot".into());
        assert_eq!(
            plan,
            Launch::Terminal {
                terminal: "foot".into(),
                editor: PathBuf::from("/usr/bin/vi")
            }
        );
    }

    #[test]
    fn direct_command_forwards_args_verbatim() {
        let plan = Launch::Direct {
            editor: PathBuf::from("/usr/bin/vi"),
        };
        let args = [OsString::from("--wait"), OsString::from("a file.txt")];
        let cmd = plan.command(&args);
        assert_eq!(cmd.get_program(), "/usr/bin/vi");
        let got: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(got, ["--wait", "a file.txt"]);
    }

    #[test]
    fn wrapped_command_puts_editor_and_args_after_dash_e() {
        let plan = Launch::Terminal {
            terminal: "foot".into(),
            editor: PathBuf::from("/usr/bin/nano"),
        };
        let args = [OsString::from("notes.txt")];
        let cmd = plan.command(&args);
        assert_eq!(cmd.get_program(), "foot");
        let got: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(got, ["-e", "/usr/bin/nano", "notes.txt"]);
    }

    #[test]
    fn empty_search_path_finds_nothing() {
        let err = find_editor_in(Some(OsStr::new(""))).unwrap_err();
        assert!(matches!(err, SatchelError::NoEditor));
    }

    #[cfg(unix)]
    mod with_fake_binaries {
        use super::super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn fake_bin(dir: &TempDir, name: &str) {
            let path = dir.path().join(name);
            std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
        }

        #[test]
        fn only_candidate_present_is_chosen() {
            let dir = TempDir::new().unwrap();
            fake_bin(&dir, "nano");
            let found = find_editor_in(Some(dir.path().as_os_str())).unwrap();
            assert_eq!(found, dir.path().join("nano"));
        }

        #[test]
        fn preference_order_beats_path_order() {
            let dir = TempDir::new().unwrap();
            fake_bin(&dir, "nano");
            fake_bin(&dir, "vim");
            let found = find_editor_in(Some(dir.path().as_os_str())).unwrap();
            assert_eq!(found, dir.path().join("vim"));
        }

        #[test]
        fn first_hit_across_directories_respects_preference() {
            let first = TempDir::new().unwrap();
            let second = TempDir::new().unwrap();
            fake_bin(&first, "nano");
            fake_bin(&second, "nvim");
            let mut path = OsString::from(first.path());
            path.push(":");
            path.push(second.path());
            let found = find_editor_in(Some(&path)).unwrap();
            assert_eq!(found, second.path().join("nvim"));
        }

        #[test]
        fn non_executable_files_are_skipped() {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("vim"), "not a program").unwrap();
            let err = find_editor_in(Some(dir.path().as_os_str())).unwrap_err();
            assert!(matches!(err, SatchelError::NoEditor));
        }
    }
}
