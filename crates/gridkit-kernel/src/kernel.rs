//! The kernel: command table plus the shared registries.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::error::{KernelError, Result};
use crate::hooks::{GridEvent, Hooks};
use crate::metadata::Extension;
use crate::renderer::RendererRegistry;
use crate::routine::RoutineDispatcher;
use crate::variables::{Accessor, VariableRegistry};

type Invoke = Rc<dyn Fn(Value) -> Result<()>>;

#[derive(Clone)]
struct CommandEntry {
    namespace: &'static str,
    name: &'static str,
    invoke: Invoke,
}

/// Central mediator between extension modules.
///
/// Modules receive an `Rc<Kernel>` when constructed; the kernel only keeps
/// weak references back to mounted modules.
#[derive(Default)]
pub struct Kernel {
    commands: RefCell<HashMap<String, CommandEntry>>,
    routines: RoutineDispatcher,
    variables: VariableRegistry,
    renderers: RendererRegistry,
    hooks: Hooks,
    diagnostics: Diagnostics,
}

impl Kernel {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn routines(&self) -> &RoutineDispatcher {
        &self.routines
    }

    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    pub fn renderers(&self) -> &RendererRegistry {
        &self.renderers
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Register a module's commands, routines, variables and hooks.
    ///
    /// Variable names are checked up front so a collision leaves the kernel
    /// untouched.
    pub fn mount<T: Extension>(&self, module: &Rc<T>) -> Result<()> {
        let metadata = T::metadata();

        for variable in &metadata.variables {
            if self.variables.contains(variable.name) {
                return Err(KernelError::DuplicateVariable(variable.name.to_string()));
            }
        }
        for routine in &metadata.routines {
            self.routines.declare(routine)?;
        }

        for variable in &metadata.variables {
            let get = variable.get;
            let weak = Rc::downgrade(module);
            let getter = move || weak.upgrade().map_or(Value::Null, |module| get(&module));
            let accessor = match (variable.mutable, variable.set) {
                (true, Some(set)) => {
                    let weak = Rc::downgrade(module);
                    let name = variable.name;
                    Accessor::read_write(getter, move |value| match weak.upgrade() {
                        Some(module) => set(&module, value),
                        None => Err(KernelError::UnknownVariable(name.to_string())),
                    })
                }
                _ => Accessor::read_only(getter),
            };
            self.variables.define(variable.name, accessor)?;
        }

        {
            let mut commands = self.commands.borrow_mut();
            for command in &metadata.commands {
                let implementation = command.implementation;
                let weak = Rc::downgrade(module);
                let name = command.name;
                let invoke: Invoke = Rc::new(move |args| match weak.upgrade() {
                    Some(module) => implementation(&module, args),
                    None => Err(KernelError::UnknownCommand(name.to_string())),
                });
                let entry = CommandEntry {
                    namespace: T::NAMESPACE,
                    name,
                    invoke,
                };
                if let Some(previous) = commands.insert(name.to_string(), entry.clone()) {
                    tracing::warn!(
                        command = name,
                        previous = previous.namespace,
                        current = T::NAMESPACE,
                        "command replaced by a later module"
                    );
                }
                commands.insert(format!("{}.{}", T::NAMESPACE, command.key), entry);
            }
        }

        for hook in &metadata.hooks {
            let handler = hook.handler;
            let weak = Rc::downgrade(module);
            self.hooks.on(T::NAMESPACE, hook.name, hook.event, move |event| {
                if let Some(module) = weak.upgrade() {
                    handler(&module, event);
                }
            });
        }

        tracing::debug!(
            module = T::NAMESPACE,
            commands = metadata.commands.len(),
            routines = metadata.routines.len(),
            variables = metadata.variables.len(),
            "module mounted"
        );
        Ok(())
    }

    /// Remove everything a module type registered.
    pub fn unmount<T: Extension>(&self) {
        let metadata = T::metadata();
        self.commands
            .borrow_mut()
            .retain(|_, entry| entry.namespace != T::NAMESPACE);
        for variable in &metadata.variables {
            self.variables.undefine(variable.name);
        }
        self.hooks.remove_owner(T::NAMESPACE);
        tracing::debug!(module = T::NAMESPACE, "module unmounted");
    }

    /// Run a command by name (`selectAll`) or qualified key
    /// (`selection.selectAll`).
    pub fn exec(&self, name: &str, args: Value) -> Result<()> {
        let invoke = self
            .commands
            .borrow()
            .get(name)
            .map(|entry| Rc::clone(&entry.invoke))
            .ok_or_else(|| KernelError::UnknownCommand(name.to_string()))?;
        tracing::trace!(command = name, %args, "exec");
        invoke(args)
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.borrow().contains_key(name)
    }

    /// Unqualified command names, sorted.
    pub fn command_names(&self) -> Vec<&'static str> {
        let commands = self.commands.borrow();
        let mut names: Vec<&'static str> = commands
            .iter()
            .filter(|(key, entry)| key.as_str() == entry.name)
            .map(|(_, entry)| entry.name)
            .collect();
        names.sort_unstable();
        names
    }

    pub fn emit(&self, event: &GridEvent) -> usize {
        self.hooks.emit(event)
    }
}
