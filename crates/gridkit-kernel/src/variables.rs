//! Kernel-published variables.
//!
//! Modules publish observable state under a name so other modules can read
//! (and, where allowed, write) it without holding a reference to the owner.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{KernelError, Result};

type Getter = Rc<dyn Fn() -> Value>;
type Setter = Rc<dyn Fn(Value) -> Result<()>>;

/// Get/set pair behind a published variable. `set` is absent for read-only
/// variables.
#[derive(Clone)]
pub struct Accessor {
    get: Getter,
    set: Option<Setter>,
}

impl Accessor {
    pub fn read_only(get: impl Fn() -> Value + 'static) -> Self {
        Accessor {
            get: Rc::new(get),
            set: None,
        }
    }

    pub fn read_write(
        get: impl Fn() -> Value + 'static,
        set: impl Fn(Value) -> Result<()> + 'static,
    ) -> Self {
        Accessor {
            get: Rc::new(get),
            set: Some(Rc::new(set)),
        }
    }

    pub fn is_mutable(&self) -> bool {
        self.set.is_some()
    }
}

/// Name → accessor table owned by the kernel.
///
/// Defining a name twice is an error; the first definition stays in place.
#[derive(Default)]
pub struct VariableRegistry {
    entries: RefCell<HashMap<String, Accessor>>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&self, name: &str, accessor: Accessor) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        if entries.contains_key(name) {
            return Err(KernelError::DuplicateVariable(name.to_string()));
        }
        tracing::debug!(variable = name, mutable = accessor.is_mutable(), "variable defined");
        entries.insert(name.to_string(), accessor);
        Ok(())
    }

    pub fn undefine(&self, name: &str) -> bool {
        self.entries.borrow_mut().remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        // Release the table before calling out; getters may read other variables.
        let get = self
            .entries
            .borrow()
            .get(name)
            .map(|accessor| Rc::clone(&accessor.get))
            .ok_or_else(|| KernelError::UnknownVariable(name.to_string()))?;
        Ok(get())
    }

    pub fn set(&self, name: &str, value: Value) -> Result<()> {
        let set = {
            let entries = self.entries.borrow();
            let accessor = entries
                .get(name)
                .ok_or_else(|| KernelError::UnknownVariable(name.to_string()))?;
            accessor
                .set
                .clone()
                .ok_or_else(|| KernelError::ReadOnlyVariable(name.to_string()))?
        };
        set(value)
    }

    /// Whether the variable's current value is truthy.
    pub fn is_truthy(&self, name: &str) -> Result<bool> {
        self.get(name).map(|value| truthy(&value))
    }
}

/// Truthiness of a published value: `null`, `false`, `0` and `""` are falsy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
