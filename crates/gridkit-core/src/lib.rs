//! gridkit-core - selection engine and reference grid model.
//!
//! The [`SelectionModule`] is a kernel extension that owns the cell
//! selection of a grid widget. It talks to the grid only through the
//! [`GridGeometry`] trait and draws through a [`SelectorHost`]; [`Sheet`] is
//! the in-memory grid used by the terminal front end and the tests.

pub mod cell_ref;
pub mod cells;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod options;
pub mod selection;
pub mod sheet;

pub use cell_ref::{Address, CellRef};
pub use cells::{NUMBER_CLASS, TEXT_CLASS, register_cell_classes};
pub use error::{GridError, Result};
pub use geometry::{Point, Rect, Vector};
pub use grid::{CellInfo, GridGeometry};
pub use options::WidgetOptions;
pub use selection::{
    DO_SELECT, Edges, Gesture, GestureState, NodeId, ReconcileReport, SelectArgs, Selection,
    SelectionModule, Selector, SelectorHost, SelectorPool, SelectorStyle,
};
pub use sheet::{CellData, Sheet};
