//! Error types for gridkit core.

use gridkit_kernel::KernelError;
use thiserror::Error;

/// Errors raised by the grid model and the selection module
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid cell reference: {0}")]
    InvalidCellRef(String),

    #[error("Cell {col},{row} is outside a {cols}x{rows} grid")]
    OutOfBounds {
        col: usize,
        row: usize,
        cols: usize,
        rows: usize,
    },

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

pub type Result<T> = std::result::Result<T, GridError>;
