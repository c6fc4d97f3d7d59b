//! Command-line surface, parsed by clap. Most of the behavior lives in
//! the `about` strings.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::item::{Item, ItemState};

#[derive(Parser)]
#[command(name = "itmn", about = "Item tree manager with reusable reference IDs", version)]
pub struct Cli {
    /// Path to the items file (default: $ITMN_FILE, then ~/.local/share/itmn)
    #[arg(short, long, env = "ITMN_FILE", global = true)]
    pub path: Option<PathBuf>,

    /// What to do; defaults to `next`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the surface tree, hiding done items
    #[command(alias = "ls")]
    List,

    /// Show surface items briefly (the default)
    Next,

    /// List all visible items without indentation
    #[command(aliases = ["flatlist", "fl"])]
    FlatList,

    /// Add an item to the root
    Add(ItemAddDetails),

    /// Select items by reference ID and do something with them
    #[command(aliases = ["s", "sel", "sri"])]
    SelRefId(SelectionDetails),
}

#[derive(Args)]
pub struct ItemAddDetails {
    /// The name of the item
    pub name: String,

    /// The context of the item
    #[arg(short, long)]
    pub context: Option<String>,

    /// Whether the item is a note instead of a task
    #[arg(short, long)]
    pub note: Option<bool>,

    /// The description of the item
    #[arg(short, long)]
    pub description: Option<String>,
}

impl ItemAddDetails {
    pub fn state(&self) -> ItemState {
        match self.note {
            Some(true) => ItemState::Note,
            Some(false) | None => ItemState::Todo,
        }
    }
}

#[derive(Args)]
pub struct SelectionDetails {
    /// The selection range: comma-separated ref IDs and A..B spans
    pub range: String,

    /// What to do with the selection; defaults to `list-tree`
    #[command(subcommand)]
    pub action: Option<SelectionAction>,
}

#[derive(Subcommand)]
pub enum SelectionAction {
    /// Modify the matches
    #[command(alias = "mod")]
    Modify(ItemBatchMod),

    /// Add a child to each one of the matches
    #[command(alias = "ac")]
    Add(ItemAddDetails),

    /// Mark todo items in the selection as done
    Done,

    /// List the selection as trees
    #[command(alias = "tree")]
    ListTree,

    /// List the selection, showing only the first child of each
    #[command(aliases = ["l", "ls", "list"])]
    ListBrief,

    /// List the selection without any children
    ListShallow,

    /// Edit the names of the selection, one per line, in the editor
    EditName,

    /// Delete the selected items and their subtrees
    #[command(aliases = ["del", "rm", "remove"])]
    Delete(ForceArgs),

    /// Swap two items; each keeps its children
    Swap(ForceArgs),

    /// Move the selection under a new owner
    #[command(alias = "chown")]
    ChangeOwnership(ChownArgs),

    /// Edit the description of an item
    #[command(aliases = ["ed", "edesc"])]
    EditDescription,

    /// Print the description of an item
    #[command(aliases = ["d", "desc"])]
    PrintDescription,
}

#[derive(Args, Clone)]
pub struct ItemBatchMod {
    /// The new name
    pub name: Option<String>,

    /// The new context; an empty string (or .void/.none) unsets it
    #[arg(short, long)]
    pub context: Option<String>,

    /// Whether the item should become a note (true) or a task (false)
    #[arg(short, long)]
    pub note: Option<bool>,
}

impl ItemBatchMod {
    /// Human-readable list of the changes about to be applied; shown
    /// before the confirmation prompt.
    pub fn describe(&self) -> Vec<String> {
        let mut changes = Vec::new();
        if let Some(name) = &self.name {
            changes.push(format!("Change name to {name:?}"));
        }
        if let Some(context) = &self.context {
            changes.push(if Item::context_means_none(context) {
                "Remove context".to_string()
            } else {
                format!("Change context to {context:?}")
            });
        }
        match self.note {
            Some(true) => changes.push("Transform into a note".to_string()),
            Some(false) => changes.push("Transform into an actionable item (task)".to_string()),
            None => {}
        }
        changes
    }

    pub fn apply(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.set_name(name);
        }
        if let Some(context) = &self.context {
            item.set_context(context);
        }
        match self.note {
            Some(true) => item.state = ItemState::Note,
            // Only notes turn back into todos; a done item stays done.
            Some(false) if item.state == ItemState::Note => item.state = ItemState::Todo,
            _ => {}
        }
    }
}

#[derive(Args)]
pub struct ForceArgs {
    /// Skip warning/confirmation messages (unsafe)
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ChownArgs {
    /// The new owner: .ROOT, a reference ID, or an internal ID prefixed by `i`
    pub new_owner: String,
}
