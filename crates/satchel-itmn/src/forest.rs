//! The item tree and the ID bookkeeping around it.

use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::item::{InternalId, Item, ItemState, RefId};
use satchel_core::ids;

/// All items, rooted in one flat vector, plus the two ID spaces in use.
#[derive(Debug)]
pub struct ItemForest {
    pub data: Vec<Item>,
    ref_ids: HashSet<u32>,
    internal_ids: HashSet<u32>,
}

impl ItemForest {
    /// Build the forest from loaded data. Duplicate IDs in either space
    /// are a hard error; non-done items that lost their reference ID
    /// (their parent was completed, or the store was hand-edited) get a
    /// fresh lowest-free one.
    pub fn new(mut data: Vec<Item>) -> Result<Self> {
        let mut ref_ids = HashSet::new();
        let mut internal_ids = HashSet::new();
        collect_ids(&data, &mut ref_ids, &mut internal_ids)?;

        fn assign_missing(items: &mut [Item], ref_ids: &mut HashSet<u32>) {
            for item in items {
                if item.ref_id.is_none() && item.state != ItemState::Done {
                    let id = ids::lowest_free(ref_ids);
                    ref_ids.insert(id);
                    item.ref_id = Some(id);
                }
                assign_missing(&mut item.children, ref_ids);
            }
        }
        assign_missing(&mut data, &mut ref_ids);

        Ok(ItemForest {
            data,
            ref_ids,
            internal_ids,
        })
    }

    pub fn find(&self, query: RefId) -> Option<&Item> {
        fn search(items: &[Item], query: RefId) -> Option<&Item> {
            for item in items {
                if item.ref_id == Some(query.0) {
                    return Some(item);
                }
                if let Some(found) = search(&item.children, query) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.data, query)
    }

    pub fn find_mut(&mut self, query: RefId) -> Option<&mut Item> {
        fn search(items: &mut [Item], query: RefId) -> Option<&mut Item> {
            for item in items {
                if item.ref_id == Some(query.0) {
                    return Some(item);
                }
                if let Some(found) = search(&mut item.children, query) {
                    return Some(found);
                }
            }
            None
        }
        search(&mut self.data, query)
    }

    pub fn find_internal(&self, query: InternalId) -> Option<&Item> {
        fn search(items: &[Item], query: InternalId) -> Option<&Item> {
            for item in items {
                if item.internal_id == query.0 {
                    return Some(item);
                }
                if let Some(found) = search(&item.children, query) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.data, query)
    }

    pub fn find_internal_mut(&mut self, query: InternalId) -> Option<&mut Item> {
        fn search(items: &mut [Item], query: InternalId) -> Option<&mut Item> {
            for item in items {
                if item.internal_id == query.0 {
                    return Some(item);
                }
                if let Some(found) = search(&mut item.children, query) {
                    return Some(found);
                }
            }
            None
        }
        search(&mut self.data, query)
    }

    fn allocate_ids(&mut self) -> (u32, u32) {
        let ref_id = ids::lowest_free(&self.ref_ids);
        self.ref_ids.insert(ref_id);
        let internal_id = ids::highest_free(&self.internal_ids);
        self.internal_ids.insert(internal_id);
        (ref_id, internal_id)
    }

    pub fn add_on_root(
        &mut self,
        name: &str,
        context: &str,
        state: ItemState,
        description: String,
    ) -> RefId {
        let (ref_id, internal_id) = self.allocate_ids();
        self.data.push(Item::new(
            Some(ref_id),
            internal_id,
            name,
            context,
            state,
            description,
            Vec::new(),
        ));
        RefId(ref_id)
    }

    pub fn add_child(
        &mut self,
        parent: RefId,
        name: &str,
        context: &str,
        state: ItemState,
        description: String,
    ) -> Result<RefId> {
        let (ref_id, internal_id) = self.allocate_ids();
        let Some(owner) = self.find_mut(parent) else {
            bail!("could not find item with ref ID {}", parent.0);
        };
        owner.children.push(Item::new(
            Some(ref_id),
            internal_id,
            name,
            context,
            state,
            description,
            Vec::new(),
        ));
        Ok(RefId(ref_id))
    }

    /// Top-level items that carry a reference ID, in store order.
    pub fn surface(&self) -> Vec<&Item> {
        self.data
            .iter()
            .filter(|item| item.ref_id.is_some())
            .collect()
    }

    pub fn first_invalid_ref_id<'a, I>(&self, ids: I) -> Option<RefId>
    where
        I: IntoIterator<Item = &'a u32>,
    {
        ids.into_iter()
            .map(|&id| RefId(id))
            .find(|&id| self.find(id).is_none())
    }

    /// Detach an item (subtree and all) from wherever it sits.
    pub fn try_remove(&mut self, query: RefId) -> Option<Item> {
        fn search(items: &mut Vec<Item>, query: RefId) -> Option<Item> {
            for i in 0..items.len() {
                if items[i].ref_id == Some(query.0) {
                    return Some(items.remove(i));
                }
                if let Some(found) = search(&mut items[i].children, query) {
                    return Some(found);
                }
            }
            None
        }
        search(&mut self.data, query)
    }

    /// Exchange two items in place, subtrees included, so each keeps its
    /// children but trades position in the tree.
    pub fn swap(&mut self, first: RefId, second: RefId) -> Result<()> {
        if first == second {
            bail!("first and second queries are the same item");
        }

        let Some(a) = self.find(first) else {
            bail!("first query could not be found");
        };
        let Some(b) = self.find(second) else {
            bail!("second query could not be found");
        };
        // Either direction would have to move a subtree into itself.
        if a.has_child(b) || b.has_child(a) {
            bail!("cannot swap an item with a member of its own subtree");
        }

        // While the first item is parked outside the tree, its slot holds
        // a placeholder carrying an internal ID no real item has, so the
        // slot stays findable without colliding with either ref ID.
        let sentinel = ids::highest_free(&self.internal_ids);
        let placeholder = Item::new(
            None,
            sentinel,
            "",
            "",
            ItemState::Note,
            String::new(),
            Vec::new(),
        );

        let Some(slot) = self.find_mut(first) else {
            bail!("first query could not be found");
        };
        let first_item = std::mem::replace(slot, placeholder);

        let Some(slot) = self.find_mut(second) else {
            *self.find_internal_mut(InternalId(sentinel)).unwrap() = first_item;
            bail!("second query could not be found");
        };
        let second_item = std::mem::replace(slot, first_item);
        *self.find_internal_mut(InternalId(sentinel)).unwrap() = second_item;
        Ok(())
    }

    /// Re-state an item through `mapper`. An item entering the done
    /// state gives up its reference ID for reuse.
    pub fn change_state<F>(&mut self, query: RefId, mapper: F) -> Result<()>
    where
        F: FnOnce(ItemState) -> ItemState,
    {
        let Some(item) = self.find_mut(query) else {
            bail!("could not find item with ref ID {}", query.0);
        };
        let new_state = mapper(item.state);
        item.state = new_state;
        if new_state == ItemState::Done {
            if let Some(id) = item.ref_id.take() {
                self.ref_ids.remove(&id);
            }
        }
        Ok(())
    }

    /// Remove every item in `selection`, recursively. IDs that are no
    /// longer present are skipped; they belonged to subtrees that were
    /// already removed earlier in this pass.
    pub fn delete_selection(&mut self, selection: &HashSet<RefId>) {
        fn prune(items: &mut Vec<Item>, selection: &HashSet<RefId>) {
            items.retain(|item| match item.ref_id {
                Some(id) => !selection.contains(&RefId(id)),
                None => true,
            });
            for item in items {
                prune(&mut item.children, selection);
            }
        }
        prune(&mut self.data, selection);
    }
}

fn collect_ids(
    items: &[Item],
    ref_ids: &mut HashSet<u32>,
    internal_ids: &mut HashSet<u32>,
) -> Result<()> {
    for item in items {
        if let Some(id) = item.ref_id {
            if !ref_ids.insert(id) {
                bail!(
                    "repeated reference ID in file: {id}; it'll have to be removed manually"
                );
            }
        }
        if !internal_ids.insert(item.internal_id) {
            bail!(
                "repeated internal ID in file: {}; it'll have to be removed manually",
                item.internal_id
            );
        }
        collect_ids(&item.children, ref_ids, internal_ids)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(ref_id: Option<u32>, internal_id: u32, name: &str, state: ItemState) -> Item {
        Item::new(
            ref_id,
            internal_id,
            name,
            "",
            state,
            String::new(),
            Vec::new(),
        )
    }

    fn sample() -> ItemForest {
        let mut parent = item(Some(0), 0, "parent", ItemState::Todo);
        parent.children.push(item(Some(2), 2, "child", ItemState::Todo));
        let other = item(Some(1), 1, "other", ItemState::Todo);
        ItemForest::new(vec![parent, other]).unwrap()
    }

    #[test]
    fn duplicate_ref_id_is_a_load_error() {
        let data = vec![
            item(Some(0), 0, "a", ItemState::Todo),
            item(Some(0), 1, "b", ItemState::Todo),
        ];
        let err = ItemForest::new(data).unwrap_err();
        assert!(err.to_string().contains("repeated reference ID"));
    }

    #[test]
    fn duplicate_internal_id_is_a_load_error() {
        let data = vec![
            item(Some(0), 3, "a", ItemState::Todo),
            item(Some(1), 3, "b", ItemState::Todo),
        ];
        let err = ItemForest::new(data).unwrap_err();
        assert!(err.to_string().contains("repeated internal ID"));
    }

    #[test]
    fn missing_ref_ids_are_assigned_to_non_done_items() {
        let data = vec![
            item(None, 0, "todo", ItemState::Todo),
            item(None, 1, "done", ItemState::Done),
            item(Some(0), 2, "keeps", ItemState::Todo),
        ];
        let forest = ItemForest::new(data).unwrap();
        assert_eq!(forest.data[0].ref_id, Some(1));
        assert_eq!(forest.data[1].ref_id, None);
        assert_eq!(forest.data[2].ref_id, Some(0));
    }

    #[test]
    fn children_are_reachable_by_ref_id() {
        let forest = sample();
        assert_eq!(forest.find(RefId(2)).unwrap().name, "child");
        assert_eq!(forest.find_internal(InternalId(2)).unwrap().name, "child");
        assert!(forest.find(RefId(9)).is_none());
    }

    #[test]
    fn ref_ids_reuse_lowest_free_and_internal_ids_never_reuse() {
        let mut forest = sample();
        forest.change_state(RefId(1), |_| ItemState::Done).unwrap();
        // ref ID 1 is free again; internal IDs keep counting up.
        let added = forest.add_on_root("new", "", ItemState::Todo, String::new());
        assert_eq!(added, RefId(1));
        let new_item = forest.find(added).unwrap();
        assert_eq!(new_item.internal_id, 3);
    }

    #[test]
    fn done_items_lose_their_ref_id() {
        let mut forest = sample();
        forest.change_state(RefId(0), |_| ItemState::Done).unwrap();
        assert!(forest.find(RefId(0)).is_none());
        assert_eq!(forest.find_internal(InternalId(0)).unwrap().state, ItemState::Done);
    }

    #[test]
    fn swap_trades_positions_and_keeps_children() {
        let mut forest = sample();
        forest.swap(RefId(0), RefId(1)).unwrap();
        assert_eq!(forest.data[0].name, "other");
        assert_eq!(forest.data[1].name, "parent");
        assert_eq!(forest.data[1].children.len(), 1, "subtree must travel with its item");
    }

    #[test]
    fn swap_works_regardless_of_argument_order() {
        let mut forest = sample();
        forest.swap(RefId(1), RefId(0)).unwrap();
        assert_eq!(forest.data[0].name, "other");
        assert_eq!(forest.data[1].name, "parent");
        assert_eq!(forest.find(RefId(2)).unwrap().name, "child");
    }

    #[test]
    fn swap_with_itself_is_an_error() {
        let mut forest = sample();
        assert!(forest.swap(RefId(0), RefId(0)).is_err());
    }

    #[test]
    fn swap_into_own_subtree_is_rejected_and_leaves_the_tree_intact() {
        let mut forest = sample();
        assert!(forest.swap(RefId(0), RefId(2)).is_err());
        assert_eq!(forest.find(RefId(0)).unwrap().name, "parent");
        assert_eq!(forest.find(RefId(2)).unwrap().name, "child");
    }

    #[test]
    fn swap_of_a_child_with_its_own_parent_is_rejected() {
        let mut forest = sample();
        let err = forest.swap(RefId(2), RefId(0)).unwrap_err();
        assert!(err.to_string().contains("subtree"), "{err}");
        assert_eq!(forest.find(RefId(0)).unwrap().name, "parent");
        assert_eq!(forest.find(RefId(0)).unwrap().children.len(), 1);
    }

    #[test]
    fn delete_selection_removes_whole_subtrees() {
        let mut forest = sample();
        forest.delete_selection(&[RefId(0)].into_iter().collect());
        assert!(forest.find(RefId(0)).is_none());
        assert!(forest.find(RefId(2)).is_none(), "children go with the parent");
        assert!(forest.find(RefId(1)).is_some());
    }

    #[test]
    fn try_remove_detaches_the_subtree() {
        let mut forest = sample();
        let removed = forest.try_remove(RefId(0)).unwrap();
        assert_eq!(removed.children.len(), 1);
        assert!(forest.find(RefId(2)).is_none());
    }

    #[test]
    fn first_invalid_ref_id_reports_the_missing_one() {
        let forest = sample();
        assert_eq!(forest.first_invalid_ref_id(&[0, 1, 2]), None);
        assert_eq!(forest.first_invalid_ref_id(&[0, 9]), Some(RefId(9)));
    }
}
