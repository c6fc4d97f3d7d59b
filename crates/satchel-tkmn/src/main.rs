//! `tkmn` — minimal flat task list.
//!
//! The older, simpler sibling of `itmn`: one ID space, no confirmations,
//! no editor round trips. Tasks keep whatever children their store file
//! gives them, but all command-line addressing is by top-level ID.

use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use satchel_core::{ids, paths, range, store};

#[derive(Parser)]
#[command(name = "tkmn", about = "Minimal flat task list", version)]
struct Cli {
    /// Path to the tasks file (default: $TKMN_FILE, then ~/.local/share/tkmn)
    #[arg(short, long, env = "TKMN_FILE", global = true)]
    path: Option<PathBuf>,

    /// What to do; defaults to `next`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        /// The name of the task
        name: String,

        /// The context of the task
        #[arg(short, long)]
        context: Option<String>,

        /// Add a note instead of a task
        #[arg(short, long)]
        note: bool,
    },

    /// List every surface task in a tree
    List,

    /// List surface tasks that are not done (the default)
    Next,

    /// Select tasks by ID and do something with them
    Sel(SelArgs),
}

#[derive(Args)]
struct SelArgs {
    /// The selection range: comma-separated IDs and A..B spans
    range: String,

    /// What to do with the selection; defaults to `list`
    #[command(subcommand)]
    action: Option<SelAction>,
}

#[derive(Subcommand)]
enum SelAction {
    /// List the selected tasks
    List,

    /// Mark the selected tasks as done
    Done,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
enum TaskState {
    Todo,
    Done,
    Note,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct Task {
    id: u32,
    name: String,
    context: Option<String>,
    state: TaskState,
    children: Vec<Task>,
}

impl Task {
    fn print(&self, out: &mut impl Write, level: usize) -> std::io::Result<()> {
        writeln!(
            out,
            "{}({}) {} {}{}",
            " ".repeat(level * 2),
            self.id,
            match self.state {
                TaskState::Todo => "TODO",
                TaskState::Done => "DONE",
                TaskState::Note => "NOTE",
            },
            self.name,
            match &self.context {
                Some(context) => format!(" ({context})"),
                None => String::new(),
            },
        )?;
        for child in &self.children {
            child.print(out, level + 1)?;
        }
        Ok(())
    }
}

struct TaskManager {
    data: Vec<Task>,
    modified: bool,
    used_ids: HashSet<u32>,
}

impl TaskManager {
    fn new(data: Vec<Task>) -> Result<Self> {
        let mut used_ids = HashSet::new();
        collect_ids(&data, &mut used_ids)?;
        Ok(TaskManager {
            data,
            modified: false,
            used_ids,
        })
    }

    fn find(&self, id: u32) -> Option<&Task> {
        self.data.iter().find(|task| task.id == id)
    }

    fn find_mut(&mut self, id: u32) -> Option<&mut Task> {
        self.modified = true;
        self.data.iter_mut().find(|task| task.id == id)
    }

    fn add(&mut self, name: String, context: Option<String>, state: TaskState) -> u32 {
        let id = ids::lowest_free(&self.used_ids);
        self.used_ids.insert(id);
        self.data.push(Task {
            id,
            name,
            context,
            state,
            children: Vec::new(),
        });
        self.modified = true;
        id
    }

    /// IDs from `selection` that don't name a top-level task.
    fn invalid_ids(&self, selection: &[u32]) -> Vec<u32> {
        selection
            .iter()
            .copied()
            .filter(|id| self.find(*id).is_none())
            .collect()
    }

    fn surface_ids(&self) -> Vec<u32> {
        self.data.iter().map(|task| task.id).collect()
    }

    fn show_report(&self, name: &str, selection: &[u32]) -> Result<()> {
        let mut out = std::io::stdout();
        writeln!(out, "Report: {name}")?;
        for &id in selection {
            self.find(id)
                .with_context(|| format!("could not find task with ID {id}"))?
                .print(&mut out, 0)?;
        }
        Ok(())
    }
}

fn collect_ids(data: &[Task], used: &mut HashSet<u32>) -> Result<()> {
    for task in data {
        if !used.insert(task.id) {
            bail!("found repeated ID: {} (task {:?})", task.id, task.name);
        }
        collect_ids(&task.children, used)?;
    }
    Ok(())
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
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let path = paths::data_file("tkmn", cli.path)?;
    tracing::debug!(path = %path.display(), "using tasks file");

    let data: Vec<Task> = store::load(&path).context("failed to load task file")?;
    let mut manager = TaskManager::new(data)?;

    match cli.command.unwrap_or(Commands::Next) {
        Commands::Add {
            name,
            context,
            note,
        } => {
            let state = if note { TaskState::Note } else { TaskState::Todo };
            manager.add(name, context, state);
            eprintln!("Task added.");
        }
        Commands::List => {
            let selection = manager.surface_ids();
            manager.show_report("Full surface listing", &selection)?;
        }
        Commands::Next => {
            let selection: Vec<u32> = manager
                .surface_ids()
                .into_iter()
                .filter(|&id| manager.find(id).unwrap().state != TaskState::Done)
                .collect();
            manager.show_report("Next up", &selection)?;
        }
        Commands::Sel(args) => {
            let selection = range::parse(&args.range).context("failed to parse range")?;
            if selection.is_empty() {
                bail!("no selection was specified");
            }
            let invalid = manager.invalid_ids(&selection);
            if !invalid.is_empty() {
                bail!("could not find tasks with IDs {invalid:?}");
            }

            match args.action.unwrap_or(SelAction::List) {
                SelAction::List => manager.show_report("Selection listing", &selection)?,
                SelAction::Done => {
                    // Notes fail the whole batch before anything is marked.
                    for &id in &selection {
                        if manager.find(id).unwrap().state == TaskState::Note {
                            bail!("task [ID:{id}] is a note and cannot be completed");
                        }
                    }
                    for &id in &selection {
                        manager.find_mut(id).unwrap().state = TaskState::Done;
                    }
                }
            }
        }
    }

    if manager.modified {
        store::save(&path, &manager.data).context("failed to save to file")?;
    }
    Ok(())
}
