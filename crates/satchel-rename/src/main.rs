//! `mass-rename` — rename a batch of files through the editor.
//!
//! The file list becomes a numbered text listing, the listing opens in
//! the editor, and whatever comes back decides the renames. Quitting the
//! editor without a clean exit abandons the run with nothing touched.

mod listing;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use satchel_core::{tmpedit, SatchelError};

#[derive(Parser)]
#[command(name = "mass-rename", about = "Batch file renamer driven through the editor", version)]
struct Cli {
    /// The files to rename; defaults to the current directory's entries
    files: Vec<PathBuf>,

    /// Read the files to rename from a list file, one path per line
    #[arg(short, long, value_name = "LIST", conflicts_with = "files")]
    as_file: Option<PathBuf>,

    /// Drop the number prefixes and match edited lines to files by order
    #[arg(long)]
    no_prefix_numbers: bool,

    /// Don't print each rename as it happens
    #[arg(short, long)]
    quiet: bool,

    /// Keep going past individual rename failures instead of stopping
    #[arg(short, long)]
    ignore_errors: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    if let Err(e) = run() {
        let silent = e
            .downcast_ref::<SatchelError>()
            .is_some_and(SatchelError::is_silent);
        if !silent {
            eprintln!("error: {e:#}");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let files = gather_files(&cli)?;
    if files.is_empty() {
        bail!("nothing to rename");
    }

    let prefix = !cli.no_prefix_numbers;
    let edited = tmpedit::edit_text(&listing::build(&files, prefix), Some("txt"))?;
    let entries = listing::parse(&edited, files.len(), prefix)?;

    let mut failed = 0usize;
    for (index, new_path) in entries {
        let old = &files[index];
        let new = PathBuf::from(new_path);
        if *old == new {
            continue;
        }

        match rename_one(old, &new) {
            Ok(()) => {
                if !cli.quiet {
                    println!("{} -> {}", old.display(), new.display());
                }
            }
            Err(e) if cli.ignore_errors => {
                eprintln!("error: {e:#}");
                failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if failed > 0 {
        bail!("{failed} rename(s) failed");
    }
    Ok(())
}

fn rename_one(old: &PathBuf, new: &PathBuf) -> Result<()> {
    // fs::rename happily replaces an existing file; refuse instead.
    if new.exists() {
        bail!("{} already exists", new.display());
    }
    std::fs::rename(old, new)
        .with_context(|| format!("failed to rename {} to {}", old.display(), new.display()))
}

fn gather_files(cli: &Cli) -> Result<Vec<PathBuf>> {
    if let Some(list) = &cli.as_file {
        let contents = std::fs::read_to_string(list)
            .with_context(|| format!("failed to read list file {}", list.display()))?;
        return Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect());
    }

    if !cli.files.is_empty() {
        return Ok(cli.files.clone());
    }

    // No arguments: offer the current directory, sorted so the listing
    // is stable run to run.
    let mut entries: Vec<PathBuf> = std::fs::read_dir(".")
        .context("failed to read current directory")?
        .map(|entry| Ok(PathBuf::from(entry?.file_name())))
        .collect::<Result<_>>()?;
    entries.sort();
    Ok(entries)
}
