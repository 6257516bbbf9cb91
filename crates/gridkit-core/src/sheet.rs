//! In-memory grid model.
//!
//! A `Sheet` is a fixed-size grid of A1-addressed cells with sparse values,
//! per-column widths and a scroll offset. It implements [`GridGeometry`] so
//! the selection module can drive it, and it is what the terminal host
//! displays.

use std::cell::{Cell, RefCell};
use std::ops::Range;

use dashmap::DashMap;
use serde_json::{Map, Value, json};

use crate::cell_ref::{Address, CellRef};
use crate::cells::{NUMBER_CLASS, TEXT_CLASS};
use crate::error::{GridError, Result};
use crate::geometry::{Point, Rect};
use crate::grid::{CellInfo, GridGeometry};

pub const DEFAULT_COLUMN_WIDTH: i32 = 10;
pub const ROW_HEIGHT: i32 = 1;

/// Stored contents of a non-empty cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellData {
    pub value: String,
    pub class: &'static str,
}

impl CellData {
    /// Pick the cell class from the value: numbers get the number class.
    pub fn infer(value: impl Into<String>) -> CellData {
        let value = value.into();
        let class = if value.trim().parse::<f64>().is_ok() {
            NUMBER_CLASS
        } else {
            TEXT_CLASS
        };
        CellData { value, class }
    }
}

pub struct Sheet {
    cells: DashMap<Address, CellData>,
    cols: Cell<usize>,
    rows: Cell<usize>,
    col_widths: RefCell<Vec<i32>>,
    scroll: Cell<Point>,
    viewport: Cell<(i32, i32)>,
    scrolled: Cell<bool>,
}

impl Sheet {
    pub fn new(cols: usize, rows: usize) -> Self {
        Sheet {
            cells: DashMap::new(),
            cols: Cell::new(cols),
            rows: Cell::new(rows),
            col_widths: RefCell::new(vec![DEFAULT_COLUMN_WIDTH; cols]),
            scroll: Cell::new(Point::default()),
            viewport: Cell::new((0, 0)),
            scrolled: Cell::new(false),
        }
    }

    /// Build a sheet from rows of values; the widest row sets the column count.
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let sheet = Sheet::new(cols, rows.len());
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                sheet.store(Address::new(col, row), value.as_ref());
            }
        }
        sheet
    }

    pub fn cols(&self) -> usize {
        self.cols.get()
    }

    pub fn rows(&self) -> usize {
        self.rows.get()
    }

    /// Set a cell by A1 reference. An empty value clears the cell.
    pub fn set(&self, cell: &str, value: impl Into<String>) -> Result<()> {
        let addr = Address::parse(cell).ok_or_else(|| GridError::InvalidCellRef(cell.to_string()))?;
        self.set_at(addr, value)
    }

    pub fn set_at(&self, addr: Address, value: impl Into<String>) -> Result<()> {
        if !self.in_bounds(addr) {
            return Err(GridError::OutOfBounds {
                col: addr.col,
                row: addr.row,
                cols: self.cols(),
                rows: self.rows(),
            });
        }
        self.store(addr, &value.into());
        Ok(())
    }

    fn store(&self, addr: Address, value: &str) {
        if value.is_empty() {
            self.cells.remove(&addr);
        } else {
            self.cells.insert(addr, CellData::infer(value));
        }
    }

    pub fn value(&self, addr: Address) -> Option<String> {
        self.cells.get(&addr).map(|data| data.value.clone())
    }

    pub fn class_of(&self, addr: Address) -> &'static str {
        self.cells.get(&addr).map_or(TEXT_CLASS, |data| data.class)
    }

    pub fn column_width(&self, col: usize) -> i32 {
        self.col_widths
            .borrow()
            .get(col)
            .copied()
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    pub fn set_column_width(&self, col: usize, width: i32) {
        if let Some(slot) = self.col_widths.borrow_mut().get_mut(col) {
            *slot = width.max(1);
        }
    }

    /// Change the grid size. Values outside the new bounds are dropped; the
    /// caller is expected to signal an invalidation afterwards.
    pub fn resize(&self, cols: usize, rows: usize) {
        self.cells
            .retain(|addr, _| addr.col < cols && addr.row < rows);
        self.col_widths
            .borrow_mut()
            .resize(cols, DEFAULT_COLUMN_WIDTH);
        self.cols.set(cols);
        self.rows.set(rows);
        tracing::debug!(cols, rows, "sheet resized");
    }

    /// Size of the visible area in view units.
    pub fn set_viewport(&self, width: i32, height: i32) {
        self.viewport.set((width.max(0), height.max(0)));
    }

    pub fn viewport(&self) -> (i32, i32) {
        self.viewport.get()
    }

    pub fn scroll(&self) -> Point {
        self.scroll.get()
    }

    pub fn scroll_to(&self, offset: Point) {
        let offset = Point::new(offset.x.max(0), offset.y.max(0));
        if offset != self.scroll.get() {
            self.scroll.set(offset);
            self.scrolled.set(true);
        }
    }

    /// Whether the sheet scrolled since the last call.
    pub fn take_scrolled(&self) -> bool {
        self.scrolled.replace(false)
    }

    /// Columns and rows at least partially inside the viewport.
    pub fn visible_range(&self) -> (Range<usize>, Range<usize>) {
        let (width, height) = self.viewport.get();
        let scroll = self.scroll.get();
        let cols = self.columns_overlapping(scroll.x, scroll.x + width);
        let rows = self.rows_overlapping(scroll.y, scroll.y + height);
        (cols, rows)
    }

    /// Fields offered to renderers for the cell at `addr`.
    pub fn fields(&self, addr: Address) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("ref".to_string(), json!(addr.to_string()));
        if let Some(data) = self.cells.get(&addr) {
            fields.insert("value".to_string(), json!(data.value));
        }
        fields
    }

    fn in_bounds(&self, addr: Address) -> bool {
        addr.col < self.cols() && addr.row < self.rows()
    }

    fn address(&self, cell: &CellRef) -> Option<Address> {
        Address::parse(cell.as_str()).filter(|addr| self.in_bounds(*addr))
    }

    fn info(&self, addr: Address) -> CellInfo {
        let data = self.cells.get(&addr).map(|data| data.value().clone());
        CellInfo {
            cell_ref: CellRef::from(addr),
            col: addr.col,
            row: addr.row,
            class: data.as_ref().map_or(TEXT_CLASS, |data| data.class),
            value: data.map(|data| data.value),
        }
    }

    fn column_left(&self, col: usize) -> i32 {
        self.col_widths.borrow().iter().take(col).sum()
    }

    fn layout_rect(&self, addr: Address) -> Rect {
        Rect::new(
            self.column_left(addr.col),
            addr.row as i32 * ROW_HEIGHT,
            self.column_width(addr.col),
            ROW_HEIGHT,
        )
    }

    /// Columns overlapping the layout span `start..end`.
    fn columns_overlapping(&self, start: i32, end: i32) -> Range<usize> {
        let widths = self.col_widths.borrow();
        let mut first = None;
        let mut last = 0;
        let mut left = 0;
        for (col, width) in widths.iter().enumerate() {
            let right = left + width;
            if right > start && left < end {
                first.get_or_insert(col);
                last = col + 1;
            }
            left = right;
        }
        match first {
            Some(first) => first..last,
            None => 0..0,
        }
    }

    fn rows_overlapping(&self, start: i32, end: i32) -> Range<usize> {
        if end <= start || end <= 0 {
            return 0..0;
        }
        let first = (start.max(0) / ROW_HEIGHT) as usize;
        let last = ((end + ROW_HEIGHT - 1) / ROW_HEIGHT) as usize;
        first.min(self.rows())..last.min(self.rows())
    }
}

impl GridGeometry for Sheet {
    fn find_cell(&self, cell: &CellRef) -> Option<CellInfo> {
        self.address(cell).map(|addr| self.info(addr))
    }

    fn locate_cell(&self, col: usize, row: usize) -> Option<CellInfo> {
        let addr = Address::new(col, row);
        self.in_bounds(addr).then(|| self.info(addr))
    }

    fn cell_at(&self, point: Point) -> Option<CellInfo> {
        let scroll = self.scroll.get();
        let (x, y) = (point.x + scroll.x, point.y + scroll.y);
        if x < 0 || y < 0 {
            return None;
        }
        let col = self.columns_overlapping(x, x + 1).next()?;
        let row = (y / ROW_HEIGHT) as usize;
        self.locate_cell(col, row)
    }

    fn cell_rect(&self, cell: &CellRef) -> Option<Rect> {
        let addr = self.address(cell)?;
        let rect = self.layout_rect(addr);
        let scroll = self.scroll.get();
        Some(Rect::new(
            rect.x - scroll.x,
            rect.y - scroll.y,
            rect.width,
            rect.height,
        ))
    }

    fn cells_in_rect(&self, rect: Rect) -> Vec<CellRef> {
        if rect.is_empty() {
            return Vec::new();
        }
        let scroll = self.scroll.get();
        let cols = self.columns_overlapping(rect.x + scroll.x, rect.right() + scroll.x);
        let rows = self.rows_overlapping(rect.y + scroll.y, rect.bottom() + scroll.y);
        rows.flat_map(|row| {
            cols.clone()
                .map(move |col| CellRef::from(Address::new(col, row)))
        })
        .collect()
    }

    fn scroll_to_cell(&self, cell: &CellRef) {
        let Some(addr) = self.address(cell) else {
            return;
        };
        let (width, height) = self.viewport.get();
        if width == 0 || height == 0 {
            return;
        }
        let rect = self.layout_rect(addr);
        let mut offset = self.scroll.get();
        if rect.x < offset.x || rect.width > width {
            offset.x = rect.x;
        } else if rect.right() > offset.x + width {
            offset.x = rect.right() - width;
        }
        if rect.y < offset.y {
            offset.y = rect.y;
        } else if rect.bottom() > offset.y + height {
            offset.y = rect.bottom() - height;
        }
        self.scroll_to(offset);
    }

    fn cells(&self) -> Vec<CellRef> {
        let cols = self.cols();
        (0..self.rows())
            .flat_map(|row| (0..cols).map(move |col| CellRef::from(Address::new(col, row))))
            .collect()
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.cols(), self.rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector;

    fn refs(names: &[&str]) -> Vec<CellRef> {
        names.iter().map(|name| CellRef::from(*name)).collect()
    }

    #[test]
    fn values_infer_their_class() {
        let sheet = Sheet::new(3, 3);
        sheet.set("A1", "hello").unwrap();
        sheet.set("B1", "42.5").unwrap();
        assert_eq!(sheet.class_of(Address::new(0, 0)), TEXT_CLASS);
        assert_eq!(sheet.class_of(Address::new(1, 0)), NUMBER_CLASS);

        sheet.set("A1", "").unwrap();
        assert_eq!(sheet.value(Address::new(0, 0)), None);
    }

    #[test]
    fn out_of_bounds_writes_are_rejected() {
        let sheet = Sheet::new(2, 2);
        assert!(matches!(sheet.set("C1", "x"), Err(GridError::OutOfBounds { .. })));
        assert!(matches!(sheet.set("1C", "x"), Err(GridError::InvalidCellRef(_))));
    }

    #[test]
    fn neighbors_stop_at_the_border() {
        let sheet = Sheet::new(3, 3);
        let b2 = CellRef::from("B2");
        let ne = sheet.find_cell_neighbor(&b2, Vector::NORTH_EAST).unwrap();
        assert_eq!(ne.cell_ref.as_str(), "C1");
        assert!(
            sheet
                .find_cell_neighbor(&CellRef::from("A1"), Vector::WEST)
                .is_none()
        );
        assert!(
            sheet
                .find_cell_neighbor(&CellRef::from("C3"), Vector::SOUTH)
                .is_none()
        );
    }

    #[test]
    fn view_rects_follow_widths_and_scroll() {
        let sheet = Sheet::new(3, 3);
        sheet.set_column_width(0, 4);
        assert_eq!(sheet.cell_rect(&CellRef::from("B2")), Some(Rect::new(4, 1, 10, 1)));

        sheet.scroll_to(Point::new(4, 1));
        assert_eq!(sheet.cell_rect(&CellRef::from("B2")), Some(Rect::new(0, 0, 10, 1)));
        assert!(sheet.take_scrolled());
        assert!(!sheet.take_scrolled());
    }

    #[test]
    fn cell_at_maps_view_points() {
        let sheet = Sheet::new(3, 3);
        assert_eq!(sheet.cell_at(Point::new(0, 0)).unwrap().cell_ref.as_str(), "A1");
        assert_eq!(sheet.cell_at(Point::new(15, 2)).unwrap().cell_ref.as_str(), "B3");
        assert!(sheet.cell_at(Point::new(30, 0)).is_none());
        assert!(sheet.cell_at(Point::new(-1, 0)).is_none());
    }

    #[test]
    fn cells_in_rect_is_row_major() {
        let sheet = Sheet::new(4, 4);
        let found = sheet.cells_in_rect(Rect::new(5, 1, 10, 2));
        assert_eq!(found, refs(&["A2", "B2", "A3", "B3"]));
        assert!(sheet.cells_in_rect(Rect::new(100, 0, 5, 5)).is_empty());
    }

    #[test]
    fn scroll_to_cell_brings_cell_into_view() {
        let sheet = Sheet::new(10, 50);
        sheet.set_viewport(30, 10);
        sheet.scroll_to_cell(&CellRef::from("E20"));
        assert_eq!(sheet.scroll(), Point::new(20, 10));
        let rect = sheet.cell_rect(&CellRef::from("E20")).unwrap();
        assert!(rect.x >= 0 && rect.right() <= 30);
        assert!(rect.y >= 0 && rect.bottom() <= 10);

        sheet.scroll_to_cell(&CellRef::from("A1"));
        assert_eq!(sheet.scroll(), Point::new(0, 0));
    }

    #[test]
    fn resize_drops_values_outside() {
        let sheet = Sheet::from_rows(&[vec!["1", "2", "3"], vec!["4", "5", "6"]]);
        sheet.resize(2, 1);
        assert_eq!(sheet.dimensions(), (2, 1));
        assert_eq!(sheet.value(Address::new(1, 0)).as_deref(), Some("2"));
        assert_eq!(sheet.value(Address::new(2, 0)), None);
        assert!(sheet.find_cell(&CellRef::from("A2")).is_none());
        assert_eq!(sheet.cells(), refs(&["A1", "B1"]));
    }

    #[test]
    fn visible_range_tracks_viewport() {
        let sheet = Sheet::new(10, 50);
        sheet.set_viewport(25, 5);
        assert_eq!(sheet.visible_range(), (0..3, 0..5));
        sheet.scroll_to(Point::new(10, 3));
        assert_eq!(sheet.visible_range(), (1..4, 3..8));
    }
}
