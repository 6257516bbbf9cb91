//! Error types for the gridkit terminal application

use gridkit_core::GridError;
use gridkit_kernel::KernelError;
use thiserror::Error;

/// Errors that can occur in the gridkit application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("Invalid grid size {cols}x{rows}")]
    InvalidSize { cols: usize, rows: usize },
}

pub type Result<T> = std::result::Result<T, AppError>;
