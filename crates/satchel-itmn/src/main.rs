//! `itmn` — item tree manager.
//!
//! Items form a forest stored as one JSON array. Every live item carries
//! a short reusable reference ID for the command line plus a permanent
//! internal ID; completing an item frees its reference ID for the next
//! add. A whole-run lock keeps concurrent invocations from clobbering
//! the store.

mod cli;
mod forest;
mod item;
mod report;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cli::{ChownArgs, Cli, Commands, ItemAddDetails, ItemBatchMod, SelectionAction, SelectionDetails};
use forest::ItemForest;
use item::{InternalId, Item, ItemState, RefId};
use report::{Depth, ReportConfig};
use satchel_core::{io, lock::RunLock, paths, range, store, tmpedit, SatchelError};

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
    let _lock = RunLock::acquire("itmn")?;

    let path = paths::data_file("itmn", cli.path)?;
    tracing::debug!(path = %path.display(), "using items file");

    let data: Vec<Item> = store::load(&path).context("failed to load items file")?;
    let mut forest = ItemForest::new(data)?;
    let cfg = ReportConfig::default();

    let modified = match cli.command.unwrap_or(Commands::Next) {
        Commands::List => {
            let surface = forest.surface();
            cfg.display_report(
                &mut std::io::stdout(),
                "All items (surface)",
                &surface,
                Depth::Tree,
                |i| i.state != ItemState::Done,
            )?;
            false
        }
        Commands::Next => {
            let surface = forest.surface();
            cfg.display_report(
                &mut std::io::stdout(),
                "Next",
                &surface,
                Depth::Brief,
                |i| i.state != ItemState::Done,
            )?;
            false
        }
        Commands::FlatList => {
            let surface = forest.surface();
            cfg.display_flat_report(
                &mut std::io::stdout(),
                "All items (flat)",
                &surface,
                |i| i.state != ItemState::Done,
            )?;
            false
        }
        Commands::Add(args) => {
            let RefId(id) = forest.add_on_root(
                &args.name,
                args.context.as_deref().unwrap_or(""),
                args.state(),
                args.description.clone().unwrap_or_default(),
            );
            eprintln!("Item added! | RefID: {id}");
            true
        }
        Commands::SelRefId(args) => selection(&mut forest, &cfg, args)?,
    };

    if modified {
        store::save(&path, &forest.data).context("failed to save changes to file")?;
    }
    Ok(())
}

/// Parse and vet the range before any action runs, so an invalid ID can
/// never leave a half-applied batch behind.
fn parse_selection(forest: &ItemForest, raw: &str) -> Result<Vec<u32>> {
    let selection = range::parse(raw).context("failed to parse range")?;
    if selection.is_empty() {
        bail!("no selection was specified");
    }
    if let Some(RefId(missing)) = forest.first_invalid_ref_id(&selection) {
        bail!("there's at least one invalid ID (#{missing}) on the selection");
    }
    Ok(selection)
}

fn selected<'a>(forest: &'a ItemForest, selection: &[u32]) -> Vec<&'a Item> {
    // Unwrap is fine: the selection was vetted against the forest.
    selection
        .iter()
        .map(|&id| forest.find(RefId(id)).unwrap())
        .collect()
}

fn report_selection(
    forest: &ItemForest,
    cfg: &ReportConfig,
    title: &str,
    selection: &[u32],
    depth: Depth,
) -> Result<()> {
    cfg.display_report(
        &mut std::io::stdout(),
        title,
        &selected(forest, selection),
        depth,
        |_| true,
    )?;
    Ok(())
}

/// A declined confirmation surfaces as a silent non-zero exit: the
/// prompt itself was the message.
fn confirmed(default: bool) -> Result<()> {
    if io::confirm(default) {
        Ok(())
    } else {
        Err(SatchelError::Cancelled.into())
    }
}

fn selection(
    forest: &mut ItemForest,
    cfg: &ReportConfig,
    args: SelectionDetails,
) -> Result<bool> {
    let selection = parse_selection(forest, &args.range)?;

    match args.action.unwrap_or(SelectionAction::ListTree) {
        SelectionAction::Modify(batch) => modify(forest, cfg, &selection, batch),
        SelectionAction::Add(details) => add_children(forest, &selection, details),
        SelectionAction::Done => mark_done(forest, cfg, &selection),
        SelectionAction::ListTree => {
            report_selection(forest, cfg, "Tree listing", &selection, Depth::Tree)?;
            Ok(false)
        }
        SelectionAction::ListBrief => {
            report_selection(forest, cfg, "Brief listing", &selection, Depth::Brief)?;
            Ok(false)
        }
        SelectionAction::ListShallow => {
            report_selection(forest, cfg, "Shallow listing", &selection, Depth::Shallow)?;
            Ok(false)
        }
        SelectionAction::EditName => edit_names(forest, &selection),
        SelectionAction::Delete(force) => delete(forest, cfg, &selection, force.force),
        SelectionAction::Swap(force) => swap(forest, cfg, &selection, force.force),
        SelectionAction::ChangeOwnership(chown) => change_ownership(forest, cfg, &selection, chown),
        SelectionAction::EditDescription => edit_description(forest, &selection),
        SelectionAction::PrintDescription => print_description(forest, &selection),
    }
}

fn modify(
    forest: &mut ItemForest,
    cfg: &ReportConfig,
    selection: &[u32],
    batch: ItemBatchMod,
) -> Result<bool> {
    report_selection(forest, cfg, "Items to be modified", selection, Depth::Shallow)?;
    eprintln!();

    let changes = batch.describe();
    if changes.is_empty() {
        eprintln!("No changes were specified");
        return Ok(false);
    }

    eprintln!("Changes to be made:");
    for change in &changes {
        eprintln!(" * {change}");
    }
    confirmed(true)?;

    for &id in selection {
        batch.apply(forest.find_mut(RefId(id)).unwrap());
    }
    Ok(true)
}

fn add_children(
    forest: &mut ItemForest,
    selection: &[u32],
    details: ItemAddDetails,
) -> Result<bool> {
    if selection.len() > 1 {
        eprintln!("More than one item was selected. All of them will receive identical new children.");
        confirmed(false)?;
    }

    eprintln!("Adding items:");
    for &id in selection {
        let RefId(ref_id) = forest.add_child(
            RefId(id),
            &details.name,
            details.context.as_deref().unwrap_or(""),
            details.state(),
            details.description.clone().unwrap_or_default(),
        )?;
        eprintln!("* RefID: {ref_id}");
    }
    Ok(true)
}

fn mark_done(forest: &mut ItemForest, cfg: &ReportConfig, selection: &[u32]) -> Result<bool> {
    report_selection(forest, cfg, "Items to be marked as done", selection, Depth::Tree)?;
    confirmed(true)?;

    for &id in selection {
        forest.change_state(RefId(id), |state| match state {
            ItemState::Todo => ItemState::Done,
            other => other,
        })?;
    }
    Ok(true)
}

/// Round-trip the selected names through the editor, one per line, and
/// apply them back in order.
fn edit_names(forest: &mut ItemForest, selection: &[u32]) -> Result<bool> {
    let names: Vec<String> = selection
        .iter()
        .map(|&id| forest.find(RefId(id)).unwrap().name.clone())
        .collect();

    let edited = tmpedit::edit_text(&names.join("\n"), Some("txt"))?;
    let edited_lines: Vec<&str> = edited.lines().filter(|line| !line.is_empty()).collect();

    if edited_lines.len() != names.len() {
        bail!(
            "incompatible amount of lines: {} (selection size) and {} (amount after editing)",
            names.len(),
            edited_lines.len()
        );
    }

    for (&id, new_name) in selection.iter().zip(edited_lines) {
        forest.find_mut(RefId(id)).unwrap().set_name(new_name);
    }
    Ok(true)
}

fn delete(
    forest: &mut ItemForest,
    cfg: &ReportConfig,
    selection: &[u32],
    force: bool,
) -> Result<bool> {
    if !force {
        report_selection(forest, cfg, "Items to be deleted", selection, Depth::Tree)?;
        confirmed(true)?;
    }

    forest.delete_selection(&selection.iter().map(|&id| RefId(id)).collect());
    Ok(true)
}

fn swap(
    forest: &mut ItemForest,
    cfg: &ReportConfig,
    selection: &[u32],
    force: bool,
) -> Result<bool> {
    if selection.len() != 2 {
        bail!(
            "the amount of selected items should be exactly two (instead of {})",
            selection.len()
        );
    }

    if !force {
        report_selection(forest, cfg, "Items to be swapped", selection, Depth::Brief)?;
        eprintln!("Each item will keep its children.");
        confirmed(true)?;
    }

    forest
        .swap(RefId(selection[0]), RefId(selection[1]))
        .context("item swap failed")?;
    Ok(true)
}

enum NewOwner {
    Root,
    ByInternal(InternalId),
    ByRef(RefId),
}

impl NewOwner {
    fn parse(arg: &str) -> Result<Self> {
        if arg == ".ROOT" {
            Ok(NewOwner::Root)
        } else if let Some(digits) = arg.strip_prefix('i') {
            match digits.parse() {
                Ok(num) => Ok(NewOwner::ByInternal(InternalId(num))),
                Err(_) => bail!("invalid number after 'i' character: {digits:?}"),
            }
        } else if let Ok(num) = arg.parse() {
            Ok(NewOwner::ByRef(RefId(num)))
        } else {
            bail!("invalid expression: {arg:?}")
        }
    }
}

fn change_ownership(
    forest: &mut ItemForest,
    cfg: &ReportConfig,
    selection: &[u32],
    args: ChownArgs,
) -> Result<bool> {
    report_selection(forest, cfg, "Items to be moved", selection, Depth::Shallow)?;

    let new_owner = NewOwner::parse(&args.new_owner).context("failed to parse new-owner argument")?;
    eprintln!();

    let owner_internal_id = match new_owner {
        NewOwner::Root => {
            eprintln!("New owner: ROOT");
            None
        }
        NewOwner::ByInternal(InternalId(id)) => {
            let Some(owner) = forest.find_internal(InternalId(id)) else {
                bail!("could not find item with internal ID {id}");
            };
            eprintln!("New owner: {:?} (I#{id})", owner.name);
            Some(id)
        }
        NewOwner::ByRef(RefId(id)) => {
            let Some(owner) = forest.find(RefId(id)) else {
                bail!("could not find item with ref ID {id}");
            };
            eprintln!("New owner: {:?} (R#{id})", owner.name);
            Some(owner.internal_id)
        }
    };

    let items = selected(forest, selection);

    // The new owner inside the selection would orphan itself.
    for item in &items {
        if Some(item.internal_id) == owner_internal_id {
            bail!(
                "item {:?} (I#{}) is on the selection and is the new owner",
                item.name,
                item.internal_id
            );
        }
    }

    // The new owner nested under a selected item would leave the tree
    // together with that item.
    if let Some(id) = owner_internal_id {
        if let Some(owner) = forest.find_internal(InternalId(id)) {
            for item in &items {
                if item.has_child(owner) {
                    bail!(
                        "the new owner is a child of {:?} (I#{}), which is on the selection",
                        item.name,
                        item.internal_id
                    );
                }
            }
        }
    }

    // A selected item nested under another selected item would be moved
    // twice; reject the selection instead of guessing an order.
    for (i, parent) in items.iter().enumerate() {
        for (j, child) in items.iter().enumerate() {
            if i != j && parent.has_child(child) {
                bail!(
                    "parent-child conflict: {:?} (I#{}) is a child of {:?} (I#{}), and both are on the selection",
                    child.name,
                    child.internal_id,
                    parent.name,
                    parent.internal_id
                );
            }
        }
    }

    eprintln!("Each item will keep its children.");
    confirmed(true)?;

    let moved: Vec<Item> = selection
        .iter()
        .map(|&id| forest.try_remove(RefId(id)).unwrap())
        .collect();

    match owner_internal_id {
        None => forest.data.extend(moved),
        Some(id) => forest
            .find_internal_mut(InternalId(id))
            .unwrap()
            .children
            .extend(moved),
    }
    Ok(true)
}

fn edit_description(forest: &mut ItemForest, selection: &[u32]) -> Result<bool> {
    let [id] = selection else {
        bail!("the selection should have exactly one item");
    };

    let item = forest.find_mut(RefId(*id)).unwrap();
    item.description = tmpedit::edit_text(&item.description, Some("md"))?;
    Ok(true)
}

fn print_description(forest: &ItemForest, selection: &[u32]) -> Result<bool> {
    let [id] = selection else {
        bail!("the selection should have exactly one item");
    };

    let description = &forest.find(RefId(*id)).unwrap().description;
    if description.ends_with('\n') || description.is_empty() {
        print!("{description}");
    } else {
        println!("{description}");
    }
    Ok(false)
}
