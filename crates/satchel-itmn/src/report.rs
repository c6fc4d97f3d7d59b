//! Terminal reports over the item tree.
//!
//! One line per item: state glyph (`o` todo, `x` done, `-` note), the
//! zero-padded reference ID, a `(D)` marker when a description is
//! attached, the `@context`, and the name. Depth decides how much of the
//! subtree rides along.

use std::io::Write;

use crate::item::{Item, ItemState};

#[derive(Debug, Clone, Copy)]
pub enum Depth {
    /// Only the item itself.
    Shallow,
    /// The item, its first child, and a count of the rest.
    Brief,
    /// The whole subtree.
    Tree,
}

pub struct ReportConfig {
    pub spaces_per_indent: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            spaces_per_indent: 2,
        }
    }
}

impl ReportConfig {
    pub fn print_single_item(&self, out: &mut impl Write, item: &Item, indent: usize) -> std::io::Result<()> {
        writeln!(
            out,
            "{}{} [{:>02}]{}{} {}",
            " ".repeat(self.spaces_per_indent * indent),
            match item.state {
                ItemState::Todo => 'o',
                ItemState::Done => 'x',
                ItemState::Note => '-',
            },
            item.ref_id.unwrap_or(item.internal_id),
            if item.description.is_empty() {
                ""
            } else {
                " (D)"
            },
            match item.context() {
                Some(context) => format!(" @{context}"),
                None => String::new(),
            },
            item.name,
        )
    }

    pub fn print_item_styled<F>(
        &self,
        out: &mut impl Write,
        item: &Item,
        depth: Depth,
        indent: usize,
        filter: F,
    ) -> std::io::Result<()>
    where
        F: Fn(&Item) -> bool + Copy,
    {
        if !filter(item) {
            return Ok(());
        }

        match depth {
            Depth::Shallow => self.print_single_item(out, item, indent)?,
            Depth::Brief => {
                self.print_single_item(out, item, indent)?;
                if let Some(first) = item.children.first() {
                    self.print_item_styled(out, first, Depth::Shallow, indent + 1, filter)?;
                }
                if item.children.len() > 1 {
                    writeln!(
                        out,
                        "{}  {} more...",
                        " ".repeat(self.spaces_per_indent * indent),
                        item.children.len() - 1
                    )?;
                }
            }
            Depth::Tree => {
                self.print_single_item(out, item, indent)?;
                for child in &item.children {
                    self.print_item_styled(out, child, Depth::Tree, indent + 1, filter)?;
                }
            }
        }
        Ok(())
    }

    /// A titled report over a pre-selected list of items.
    pub fn display_report<F>(
        &self,
        out: &mut impl Write,
        name: &str,
        items: &[&Item],
        depth: Depth,
        filter: F,
    ) -> std::io::Result<()>
    where
        F: Fn(&Item) -> bool + Copy,
    {
        writeln!(out, "{} | {} selected items", name, items.len())?;
        for item in items {
            self.print_item_styled(out, item, depth, 0, filter)?;
        }
        Ok(())
    }

    /// Indentation-free listing of every item passing the filter, for
    /// piping into other tools.
    pub fn display_flat_report<F>(
        &self,
        out: &mut impl Write,
        name: &str,
        items: &[&Item],
        filter: F,
    ) -> std::io::Result<()>
    where
        F: Fn(&Item) -> bool + Copy,
    {
        fn walk<F>(
            cfg: &ReportConfig,
            out: &mut impl Write,
            item: &Item,
            filter: F,
        ) -> std::io::Result<()>
        where
            F: Fn(&Item) -> bool + Copy,
        {
            if !filter(item) {
                return Ok(());
            }
            cfg.print_single_item(out, item, 0)?;
            for child in &item.children {
                walk(cfg, out, child, filter)?;
            }
            Ok(())
        }

        writeln!(out, "{} | {} selected items", name, items.len())?;
        for item in items {
            walk(self, out, item, filter)?;
        }
        Ok(())
    }
}
