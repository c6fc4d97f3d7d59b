//! The storage unit of the item tree.

use serde::{Deserialize, Serialize};

/// User-facing handle. Allocated lowest-free so handles stay short, and
/// freed when an item is marked done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefId(pub u32);

/// Permanent handle. Allocated highest-free and never reused while any
/// item is alive, so done items stay addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InternalId(pub u32);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ItemState {
    /// Actionable, not yet done.
    Todo,
    /// Actionable and finished.
    Done,
    /// Not actionable; can never become done.
    Note,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub state: ItemState,
    pub ref_id: Option<u32>,
    pub internal_id: u32,
    /// Free-form notes attached to the item; absent in older stores.
    #[serde(default)]
    pub description: String,
    pub children: Vec<Item>,
    context: Option<String>,
}

impl Item {
    pub fn new(
        ref_id: Option<u32>,
        internal_id: u32,
        name: &str,
        context: &str,
        state: ItemState,
        description: String,
        children: Vec<Item>,
    ) -> Self {
        Item {
            ref_id,
            internal_id,
            name: validate_name(name),
            context: validate_context(context),
            state,
            description,
            children,
        }
    }

    /// A few spellings all mean "no context".
    pub fn context_means_none(context: &str) -> bool {
        matches!(context.to_lowercase().as_str(), "" | ".void" | ".none")
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn set_context(&mut self, new_context: &str) {
        self.context = validate_context(new_context);
    }

    pub fn set_name(&mut self, new_name: &str) {
        self.name = validate_name(new_name);
    }

    /// True if `other` sits anywhere in this item's subtree.
    pub fn has_child(&self, other: &Item) -> bool {
        self.children
            .iter()
            .any(|child| child.internal_id == other.internal_id || child.has_child(other))
    }
}

fn validate_context(context: &str) -> Option<String> {
    if Item::context_means_none(context) {
        None
    } else {
        Some(context.chars().filter(|&c| valid_char(c)).collect())
    }
}

fn validate_name(name: &str) -> String {
    name.chars().filter(|&c| valid_char(c)).collect()
}

/// Names and contexts are single-line; control whitespace would corrupt
/// reports and the edit-name round trip.
fn valid_char(c: char) -> bool {
    !matches!(c, '\n' | '\t' | '\r')
}
