//! Error types for the Gridkit kernel.

use thiserror::Error;

/// Usage errors raised by the kernel.
///
/// These are programmer mistakes (bad registrations, writes to read-only
/// state, unknown names) and are reported at registration or access time.
#[derive(Error, Debug)]
pub enum KernelError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid arguments for command '{command}': {source}")]
    InvalidArguments {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Variable '{0}' is already defined")]
    DuplicateVariable(String),

    #[error("Variable '{0}' is read-only")]
    ReadOnlyVariable(String),

    #[error("Invalid value for variable '{name}': {message}")]
    InvalidVariableValue { name: String, message: String },

    #[error("Routine '{key}' is declared as {expected}, not {found}")]
    RoutineSignature {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unknown cell class: {0}")]
    UnknownCellClass(String),

    #[error("Cell class '{0}' is already registered")]
    DuplicateCellClass(String),

    #[error("Cell class '{0}' already has a renderer")]
    DuplicateRenderer(String),
}

pub type Result<T> = std::result::Result<T, KernelError>;
