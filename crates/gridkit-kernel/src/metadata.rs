//! Per-type extension metadata.
//!
//! Each extension type builds its tables once (typically behind a
//! `OnceLock`) and hands them to the kernel through [`Extension::metadata`].
//! The kernel reads them once per instance when the instance is mounted.
//!
//! ```ignore
//! impl Extension for Counter {
//!     const NAMESPACE: &'static str = "counter";
//!
//!     fn metadata() -> &'static Metadata<Self> {
//!         static METADATA: OnceLock<Metadata<Counter>> = OnceLock::new();
//!         METADATA.get_or_init(|| {
//!             Metadata::new()
//!                 .command("increment", Counter::increment_command)
//!                 .variable("count", Counter::count_value)
//!         })
//!     }
//! }
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{KernelError, Result};
use crate::hooks::{EventKind, GridEvent};
use crate::routine::{Routine, RoutineDescriptor};

pub type CommandFn<T> = fn(&T, Value) -> Result<()>;
pub type GetFn<T> = fn(&T) -> Value;
pub type SetFn<T> = fn(&T, Value) -> Result<()>;
pub type HookHandler<T> = fn(&T, &GridEvent);

/// An externally callable action.
pub struct CommandDescriptor<T> {
    pub name: &'static str,
    pub key: &'static str,
    pub implementation: CommandFn<T>,
}

/// An observable field of the extension.
pub struct VariableDescriptor<T> {
    pub name: &'static str,
    pub key: &'static str,
    pub mutable: bool,
    pub get: GetFn<T>,
    pub set: Option<SetFn<T>>,
}

/// A lifecycle hook.
pub struct HookDescriptor<T> {
    pub name: &'static str,
    pub event: EventKind,
    pub handler: HookHandler<T>,
}

/// The tables of one extension type.
pub struct Metadata<T> {
    pub commands: Vec<CommandDescriptor<T>>,
    pub routines: Vec<RoutineDescriptor>,
    pub variables: Vec<VariableDescriptor<T>>,
    pub hooks: Vec<HookDescriptor<T>>,
}

impl<T> Default for Metadata<T> {
    fn default() -> Self {
        Metadata {
            commands: Vec::new(),
            routines: Vec::new(),
            variables: Vec::new(),
            hooks: Vec::new(),
        }
    }
}

impl<T: 'static> Metadata<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a command whose key is its name.
    pub fn command(self, name: &'static str, implementation: CommandFn<T>) -> Self {
        self.command_as(name, name, implementation)
    }

    pub fn command_as(
        mut self,
        name: &'static str,
        key: &'static str,
        implementation: CommandFn<T>,
    ) -> Self {
        self.commands.push(CommandDescriptor {
            name,
            key,
            implementation,
        });
        self
    }

    pub fn routine<A: 'static, R: 'static>(mut self, routine: &Routine<T, A, R>) -> Self {
        self.routines.push(routine.descriptor());
        self
    }

    /// Declare a read-only variable.
    pub fn variable(mut self, name: &'static str, get: GetFn<T>) -> Self {
        self.variables.push(VariableDescriptor {
            name,
            key: name,
            mutable: false,
            get,
            set: None,
        });
        self
    }

    pub fn variable_mut(mut self, name: &'static str, get: GetFn<T>, set: SetFn<T>) -> Self {
        self.variables.push(VariableDescriptor {
            name,
            key: name,
            mutable: true,
            get,
            set: Some(set),
        });
        self
    }

    pub fn hook(mut self, name: &'static str, event: EventKind, handler: HookHandler<T>) -> Self {
        self.hooks.push(HookDescriptor {
            name,
            event,
            handler,
        });
        self
    }
}

/// Capability implemented by every mountable extension type.
pub trait Extension: Sized + 'static {
    /// Prefix for this extension's qualified command keys (`namespace.key`).
    const NAMESPACE: &'static str;

    fn metadata() -> &'static Metadata<Self>;
}

/// Decode command arguments into their typed form.
pub fn parse_args<A: DeserializeOwned>(command: &'static str, args: Value) -> Result<A> {
    serde_json::from_value(args).map_err(|source| KernelError::InvalidArguments { command, source })
}
