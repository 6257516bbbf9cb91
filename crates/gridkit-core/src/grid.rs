//! The geometry a grid model exposes to the selection engine.

use crate::cell_ref::CellRef;
use crate::geometry::{Point, Rect, Vector};

/// What the grid knows about one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellInfo {
    pub cell_ref: CellRef,
    pub col: usize,
    pub row: usize,
    /// Displayed value; `None` when the cell holds nothing.
    pub value: Option<String>,
    /// Cell class name, used to resolve a renderer.
    pub class: &'static str,
}

impl CellInfo {
    /// Whether the cell counts as empty for edge walks: missing, blank or "0".
    pub fn is_blank(&self) -> bool {
        matches!(self.value.as_deref(), None | Some("") | Some("0"))
    }
}

/// Read access to the layout and contents of a grid.
///
/// Coordinates handed in and out are view coordinates (layout minus scroll).
pub trait GridGeometry {
    fn find_cell(&self, cell: &CellRef) -> Option<CellInfo>;

    fn locate_cell(&self, col: usize, row: usize) -> Option<CellInfo>;

    /// Cell one step away from `cell` along a unit `direction`.
    fn find_cell_neighbor(&self, cell: &CellRef, direction: Vector) -> Option<CellInfo> {
        let info = self.find_cell(cell)?;
        let col = info.col.checked_add_signed(direction.x as isize)?;
        let row = info.row.checked_add_signed(direction.y as isize)?;
        self.locate_cell(col, row)
    }

    fn cell_at(&self, point: Point) -> Option<CellInfo>;

    fn cell_rect(&self, cell: &CellRef) -> Option<Rect>;

    /// References of every cell whose view rectangle intersects `rect`, row-major.
    fn cells_in_rect(&self, rect: Rect) -> Vec<CellRef>;

    fn scroll_to_cell(&self, cell: &CellRef);

    /// Every cell reference, in model (row-major) order.
    fn cells(&self) -> Vec<CellRef>;

    /// `(columns, rows)`.
    fn dimensions(&self) -> (usize, usize);
}
