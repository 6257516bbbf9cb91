//! Cell selection: the selection model, pointer gestures, keyboard
//! navigation and the selector pool that draws the selection.

pub mod gesture;
pub mod module;
pub mod navigation;
pub mod reconcile;

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::cell_ref::CellRef;

pub use gesture::{Gesture, GestureState};
pub use module::{DO_SELECT, SelectArgs, SelectionModule};
pub use reconcile::{Edges, NodeId, ReconcileReport, Selector, SelectorHost, SelectorPool, SelectorStyle};

static EMPTY: LazyLock<Arc<Selection>> = LazyLock::new(|| {
    Arc::new(Selection {
        items: Vec::new(),
        members: HashSet::new(),
    })
});

/// An ordered set of selected cells. The first cell is the primary.
///
/// Selections are immutable; every selection change swaps in a new one.
#[derive(Debug, PartialEq, Eq)]
pub struct Selection {
    items: Vec<CellRef>,
    members: HashSet<CellRef>,
}

impl Selection {
    /// The shared empty selection.
    pub fn empty() -> Arc<Selection> {
        Arc::clone(&EMPTY)
    }

    /// Build a selection in the given order, dropping repeated cells.
    /// No cells yields the shared empty selection.
    pub fn from_refs(cells: impl IntoIterator<Item = CellRef>) -> Arc<Selection> {
        let mut items = Vec::new();
        let mut members = HashSet::new();
        for cell in cells {
            if members.insert(cell.clone()) {
                items.push(cell);
            }
        }
        if items.is_empty() {
            return Selection::empty();
        }
        Arc::new(Selection { items, members })
    }

    /// Whether `selection` is the shared empty instance.
    pub fn is_canonical_empty(selection: &Arc<Selection>) -> bool {
        Arc::ptr_eq(selection, &EMPTY)
    }

    pub fn primary(&self) -> Option<&CellRef> {
        self.items.first()
    }

    pub fn items(&self) -> &[CellRef] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellRef> {
        self.items.iter()
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        self.members.contains(cell)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(names: &[&str]) -> Vec<CellRef> {
        names.iter().map(|name| CellRef::from(*name)).collect()
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let selection = Selection::from_refs(refs(&["B2", "A1", "B2", "C3", "A1"]));
        assert_eq!(selection.items(), refs(&["B2", "A1", "C3"]).as_slice());
        assert_eq!(selection.primary().map(CellRef::as_str), Some("B2"));
    }

    #[test]
    fn no_cells_is_the_shared_empty_selection() {
        let selection = Selection::from_refs(Vec::new());
        assert!(Selection::is_canonical_empty(&selection));
        assert!(Selection::is_canonical_empty(&Selection::empty()));
        assert!(selection.primary().is_none());
    }

    #[test]
    fn membership_matches_items() {
        let selection = Selection::from_refs(refs(&["A1", "A2"]));
        assert!(selection.contains(&CellRef::from("A2")));
        assert!(!selection.contains(&CellRef::from("B1")));
        assert!(!Selection::is_canonical_empty(&selection));
    }
}
