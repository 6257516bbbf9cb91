//! Target computation for the navigation commands.
//!
//! Each function answers "which cells should be selected next" from the
//! current primary cell and the grid geometry; none of them touch the
//! selection itself.

use crate::cell_ref::CellRef;
use crate::geometry::{Point, Rect, Vector};
use crate::grid::GridGeometry;

/// Adjacent cell of `primary` along `direction`, snapped to a unit vector.
pub fn neighbor(grid: &dyn GridGeometry, primary: &CellRef, direction: Vector) -> Option<CellRef> {
    let direction = direction.normalize();
    if direction.is_zero() {
        return None;
    }
    grid.find_cell_neighbor(primary, direction)
        .map(|info| info.cell_ref)
}

/// Cell on the grid border in `direction`. Each axis is clamped on its own:
/// a negative component goes to the first column/row, a positive one to the
/// last, zero keeps the primary's.
pub fn border(grid: &dyn GridGeometry, primary: &CellRef, direction: Vector) -> Option<CellRef> {
    let info = grid.find_cell(primary)?;
    let (cols, rows) = grid.dimensions();
    let clamp = |component: i32, current: usize, count: usize| match component.signum() {
        -1 => 0,
        1 => count.saturating_sub(1),
        _ => current,
    };
    let col = clamp(direction.x, info.col, cols);
    let row = clamp(direction.y, info.row, rows);
    grid.locate_cell(col, row).map(|info| info.cell_ref)
}

/// End of the data run in `direction`.
///
/// The walk starts at the primary's neighbor and advances until it stands on
/// a filled cell whose next cell is blank. Running off the grid selects the
/// last cell reached. Blank means missing, `""` or `"0"`. A blank cell followed
/// by a filled one does not stop the walk; it steps onto the filled cell.
pub fn edge(grid: &dyn GridGeometry, primary: &CellRef, direction: Vector) -> Option<CellRef> {
    let direction = direction.normalize();
    if direction.is_zero() {
        return None;
    }
    let mut current = grid.find_cell_neighbor(primary, direction)?;
    while let Some(next) = grid.find_cell_neighbor(&current.cell_ref, direction) {
        if !current.is_blank() && next.is_blank() {
            break;
        }
        current = next;
    }
    Some(current.cell_ref)
}

/// Cells between the primary's top-left corner and `point`, primary first.
pub fn line(grid: &dyn GridGeometry, primary: &CellRef, point: Point) -> Vec<CellRef> {
    let Some(origin) = grid.cell_rect(primary) else {
        return Vec::new();
    };
    let rect = Rect::spanning(origin.top_left(), point);
    anchor_first(grid.cells_in_rect(rect), primary)
}

/// Cells covered by the bounding box of two cells, `start` first.
pub fn range(grid: &dyn GridGeometry, start: &CellRef, end: &CellRef) -> Vec<CellRef> {
    let (Some(a), Some(b)) = (grid.cell_rect(start), grid.cell_rect(end)) else {
        return Vec::new();
    };
    anchor_first(grid.cells_in_rect(a.union(&b)), start)
}

/// Move `anchor` to the front of `cells`.
pub fn anchor_first(mut cells: Vec<CellRef>, anchor: &CellRef) -> Vec<CellRef> {
    cells.retain(|cell| cell != anchor);
    cells.insert(0, anchor.clone());
    cells
}
