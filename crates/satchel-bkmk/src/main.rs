//! `bkmk` — bookmark manager over a JSON store.
//!
//! Bookmarks live in a single pretty-printed JSON array. `add` and
//! `import` grow it from the command line; `menu` drives a fuzzy-picker
//! loop for everything interactive (open, archive, copy, delete, retitle).

mod bookmark;
mod manager;

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use bookmark::clean_title;
use manager::BookmarkManager;
use satchel_core::{paths, picker, tmpedit, SatchelError};

#[derive(Parser)]
#[command(name = "bkmk", about = "Bookmark manager with a fuzzy-picker menu", version)]
struct Cli {
    /// Path to the bookmarks file (default: $BKMK_FILE, then ~/.local/share/bkmk)
    #[arg(short, long, env = "BKMK_FILE", global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a URL to the bookmarks list
    Add {
        /// The URL of the bookmark
        url: String,

        /// The title of the bookmark (fetched from the page when omitted)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Add every URL from a newline-delimited list file
    Import { file: PathBuf },

    /// Pick a bookmark and an action interactively
    Menu,
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
        // Cancels already played out on the user's screen (a closed
        // picker, an abandoned editor); repeating them is just noise.
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
    let path = paths::data_file("bkmk", cli.path)?;
    tracing::debug!(path = %path.display(), "using bookmarks file");

    let mut manager = BookmarkManager::load(&path)?;

    match cli.command {
        Commands::Add { url, title } => match title {
            Some(title) => {
                manager.add(clean_title(&title), url, Vec::new())?;
            }
            None => {
                manager.add_from_url(url, true)?;
            }
        },
        Commands::Import { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            for url in contents.lines().map(str::trim).filter(|l| !l.is_empty()) {
                manager.add_from_url(url.to_string(), true)?;
            }
        }
        Commands::Menu => menu(&mut manager)?,
    }

    manager.save_if_modified(&path)
}

/// The menu actions, in the order they are offered.
const ACTIONS: [&str; 5] = [
    "open (via $OPENER or the system opener)",
    "archive",
    "copy to clipboard (via xclip)",
    "delete",
    "edit title",
];

fn menu(manager: &mut BookmarkManager) -> Result<()> {
    let not_archived: Vec<_> = manager
        .data()
        .iter()
        .filter(|bkmk| !bkmk.archived)
        .collect();
    if not_archived.is_empty() {
        bail!("there are no unarchived bookmarks to select");
    }

    let chosen = picker::pick(
        &format!("Bookmark ({}): ", not_archived.len()),
        not_archived
            .iter()
            .enumerate()
            .map(|(i, bkmk)| format!("{i:>3} {:<95} ({})", bkmk.name, bkmk.url)),
    )?;
    let index: usize = chosen
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .parse()
        .context("picker returned an unrecognized line")?;
    let id = not_archived
        .get(index)
        .map(|bkmk| bkmk.id)
        .context("picker returned an out-of-range index")?;

    let chosen = picker::pick(
        "Action: ",
        ACTIONS
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{i} {name}")),
    )?;
    let action: usize = chosen
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .parse()
        .context("picker returned an unrecognized line")?;

    match action {
        0 => open_bookmark(manager, id),
        1 => {
            manager.find_mut(id).context("bookmark vanished")?.archived = true;
            Ok(())
        }
        2 => copy_to_clipboard(manager, id),
        3 => {
            manager.delete(id);
            Ok(())
        }
        4 => edit_title(manager, id),
        other => bail!("invalid action ID: {other}"),
    }
}

fn open_bookmark(manager: &BookmarkManager, id: u32) -> Result<()> {
    let url = &manager.find(id).context("bookmark vanished")?.url;

    match std::env::var("OPENER") {
        Ok(opener) if !opener.trim().is_empty() => {
            let status = Command::new(&opener)
                .arg(url)
                .status()
                .with_context(|| format!("failed to start opener command {opener:?}"))?;
            if !status.success() {
                return Err(SatchelError::Cancelled.into());
            }
            Ok(())
        }
        _ => open::that(url).with_context(|| format!("failed to open {url}")),
    }
}

fn copy_to_clipboard(manager: &BookmarkManager, id: u32) -> Result<()> {
    let url = &manager.find(id).context("bookmark vanished")?.url;

    let mut child = Command::new("xclip")
        .args(["-sel", "clipboard"])
        .stdin(Stdio::piped())
        .spawn()
        .context("failed to start xclip command")?;
    child
        .stdin
        .as_mut()
        .context("xclip stdin unavailable")?
        .write_all(url.as_bytes())?;
    if !child.wait()?.success() {
        bail!("failed to save to clipboard");
    }
    Ok(())
}

fn edit_title(manager: &mut BookmarkManager, id: u32) -> Result<()> {
    let current = manager.find(id).context("bookmark vanished")?.name.clone();
    let edited = tmpedit::edit_text(&current, Some("txt")).context("failed to edit title")?;
    manager.find_mut(id).context("bookmark vanished")?.name = clean_title(&edited);
    Ok(())
}
