//! Selectors: host-drawn markers over selected cells.
//!
//! The pool owns one [`Selector`] per selected cell. Reconciling against a
//! new selection keeps the selectors that still match, detaches the rest and
//! attaches new ones, so a host only ever sees the difference.

use std::collections::HashMap;
use std::rc::Rc;

use crate::cell_ref::CellRef;
use crate::geometry::{Rect, Vector};
use crate::grid::GridGeometry;
use crate::selection::Selection;

/// Host-side handle of an attached selector node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Sides of a selector that lie on the outline of the selected region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectorStyle {
    pub primary: bool,
    pub edges: Edges,
}

/// The surface selectors are drawn on.
pub trait SelectorHost {
    fn attach(&self, cell: &CellRef, primary: bool) -> NodeId;

    fn detach(&self, node: NodeId);

    /// Move a node over `rect`; `None` when the cell has no view rectangle.
    fn place(&self, node: NodeId, rect: Option<Rect>, style: SelectorStyle, animate: bool);
}

/// Attached node; detached from its host when dropped.
struct Node {
    host: Rc<dyn SelectorHost>,
    id: NodeId,
}

impl Drop for Node {
    fn drop(&mut self) {
        self.host.detach(self.id);
    }
}

pub struct Selector {
    cell: CellRef,
    primary: bool,
    node: Node,
}

impl Selector {
    fn attach(host: &Rc<dyn SelectorHost>, cell: CellRef, primary: bool) -> Selector {
        let id = host.attach(&cell, primary);
        Selector {
            cell,
            primary,
            node: Node {
                host: Rc::clone(host),
                id,
            },
        }
    }

    pub fn cell(&self) -> &CellRef {
        &self.cell
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn node(&self) -> NodeId {
        self.node.id
    }
}

/// Selector churn caused by one reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub destroyed: usize,
    pub kept: usize,
}

pub struct SelectorPool {
    host: Rc<dyn SelectorHost>,
    selectors: Vec<Selector>,
}

impl SelectorPool {
    pub fn new(host: Rc<dyn SelectorHost>) -> Self {
        SelectorPool {
            host,
            selectors: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.selectors.iter()
    }

    /// Bring the pool in line with `selection`.
    ///
    /// A selector survives when its cell is still selected and its primary
    /// flag is still right; everything else is rebuilt. The pool ends up in
    /// selection order.
    pub fn reconcile(&mut self, selection: &Selection) -> ReconcileReport {
        let primary = selection.primary();
        let mut kept: HashMap<CellRef, Selector> = HashMap::new();
        let mut destroyed = 0;
        for selector in self.selectors.drain(..) {
            let wants_primary = primary == Some(&selector.cell);
            if selection.contains(&selector.cell) && selector.primary == wants_primary {
                kept.insert(selector.cell.clone(), selector);
            } else {
                destroyed += 1;
            }
        }

        let mut report = ReconcileReport {
            destroyed,
            kept: kept.len(),
            ..ReconcileReport::default()
        };
        for cell in selection.iter() {
            let selector = match kept.remove(cell) {
                Some(selector) => selector,
                None => {
                    report.created += 1;
                    Selector::attach(&self.host, cell.clone(), primary == Some(cell))
                }
            };
            self.selectors.push(selector);
        }
        report
    }

    /// Describe a mismatch between the pool and `selection`, if any.
    pub fn check_consistency(&self, selection: &Selection) -> Option<String> {
        if selection.is_empty() && !self.selectors.is_empty() {
            return Some(format!(
                "{} selector(s) left over after clearing the selection",
                self.selectors.len()
            ));
        }
        if self.selectors.len() != selection.len() {
            return Some(format!(
                "{} selector(s) for {} selected cell(s)",
                self.selectors.len(),
                selection.len()
            ));
        }
        None
    }

    /// Place every selector over its cell and mark the region outline.
    pub fn reposition(&self, grid: &dyn GridGeometry, selection: &Selection, animate: bool) {
        for selector in &self.selectors {
            let outside = |direction: Vector| {
                grid.find_cell_neighbor(&selector.cell, direction)
                    .is_none_or(|info| !selection.contains(&info.cell_ref))
            };
            let style = SelectorStyle {
                primary: selector.primary,
                edges: Edges {
                    top: outside(Vector::NORTH),
                    right: outside(Vector::EAST),
                    bottom: outside(Vector::SOUTH),
                    left: outside(Vector::WEST),
                },
            };
            self.host
                .place(selector.node.id, grid.cell_rect(&selector.cell), style, animate);
        }
    }

    /// Detach every selector.
    pub fn clear(&mut self) -> usize {
        let count = self.selectors.len();
        self.selectors.clear();
        count
    }
}
