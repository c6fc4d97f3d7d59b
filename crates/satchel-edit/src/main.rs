//! `edit` — run the best installed editor on whatever was passed in.
//!
//! Meant to sit behind `$EDITOR`, hotkeys, and scripts that should not
//! care which editor a machine happens to have. Picks the first of
//! nvim/vim/vi/nano on PATH, and when there is no terminal to inherit
//! (both stdout and stderr redirected), wraps the editor in `$TERMINAL`
//! so it gets one.

use std::ffi::OsString;
use std::io::IsTerminal;

use anyhow::Context;
use satchel_core::editor::{self, Launch};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Everything after the program name belongs to the editor, verbatim.
    // No argument parser here: `edit --help` must open a file called
    // --help, not print a usage screen.
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    let editor = editor::find_editor()?;

    let tty = std::io::stdout().is_terminal() || std::io::stderr().is_terminal();
    let plan = Launch::decide(tty, editor, editor::terminal_emulator());
    tracing::debug!(?plan, "launching editor");

    // On success exec never returns; reaching the line below means the
    // chosen program could not be started.
    let err = editor::exec(plan.command(&args));
    Err(err).context("failed to launch editor")
}
