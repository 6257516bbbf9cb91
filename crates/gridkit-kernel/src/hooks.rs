//! Grid lifecycle events and the hooks listening for them.

use std::cell::RefCell;
use std::rc::Rc;

/// Events delivered to hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridEvent {
    /// The grid's data model changed; cached cell references may be stale.
    Invalidate,
    /// The view scrolled.
    Scroll,
    /// Layout settled after a resize or relayout.
    Bash,
    /// The selection was replaced.
    SelectionChanged {
        primary: Option<String>,
        count: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Invalidate,
    Scroll,
    Bash,
    SelectionChanged,
}

impl GridEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GridEvent::Invalidate => EventKind::Invalidate,
            GridEvent::Scroll => EventKind::Scroll,
            GridEvent::Bash => EventKind::Bash,
            GridEvent::SelectionChanged { .. } => EventKind::SelectionChanged,
        }
    }
}

pub type HookFn = Rc<dyn Fn(&GridEvent)>;

#[derive(Clone)]
struct HookEntry {
    owner: &'static str,
    name: &'static str,
    event: EventKind,
    handler: HookFn,
}

/// Ordered list of event hooks.
#[derive(Default)]
pub struct Hooks {
    entries: RefCell<Vec<HookEntry>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        &self,
        owner: &'static str,
        name: &'static str,
        event: EventKind,
        handler: impl Fn(&GridEvent) + 'static,
    ) {
        self.entries.borrow_mut().push(HookEntry {
            owner,
            name,
            event,
            handler: Rc::new(handler),
        });
    }

    /// Drop every hook registered by `owner`.
    pub fn remove_owner(&self, owner: &str) -> usize {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.owner != owner);
        before - entries.len()
    }

    /// Run the hooks for `event` in registration order. Returns how many ran.
    pub fn emit(&self, event: &GridEvent) -> usize {
        let kind = event.kind();
        let matching: Vec<HookEntry> = self
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.event == kind)
            .cloned()
            .collect();
        for entry in &matching {
            tracing::trace!(hook = entry.name, owner = entry.owner, ?kind, "running hook");
            (entry.handler)(event);
        }
        matching.len()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
