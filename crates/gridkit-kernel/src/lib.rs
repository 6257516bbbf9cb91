//! gridkit-kernel - extension kernel for the Gridkit grid widget.
//!
//! Extension modules describe themselves with static [`Metadata`] tables and
//! are mounted into a [`Kernel`], which then mediates every cross-module
//! interaction:
//!
//! - commands callable by name ([`Kernel::exec`])
//! - routines whose base logic other modules may intercept ([`Routine`])
//! - published variables ([`VariableRegistry`])
//! - cell renderers resolved along a class chain ([`RendererRegistry`])
//! - lifecycle hooks ([`Hooks`]) and a diagnostics channel ([`Diagnostics`])

pub mod diagnostics;
pub mod error;
pub mod hooks;
pub mod kernel;
pub mod metadata;
pub mod renderer;
pub mod routine;
pub mod variables;

pub use diagnostics::{Diagnostic, Diagnostics, MAX_DIAGNOSTICS};
pub use error::{KernelError, Result};
pub use hooks::{EventKind, GridEvent, Hooks};
pub use kernel::Kernel;
pub use metadata::{
    CommandDescriptor, Extension, HookDescriptor, Metadata, VariableDescriptor, parse_args,
};
pub use renderer::{Canvas, CellClass, Emphasis, RenderFn, RendererRegistry, Visual};
pub use routine::{
    Interceptor, InterceptorId, Next, Routine, RoutineDescriptor, RoutineDispatcher, Signature,
};
pub use variables::{Accessor, VariableRegistry, truthy};
