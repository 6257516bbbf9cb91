//! Diagnostics channel for internal-consistency violations.
//!
//! Violations are logged and kept until drained so hosts and tests can
//! observe them without the widget failing. Only the most recent
//! [`MAX_DIAGNOSTICS`] entries are kept.

use std::cell::RefCell;
use std::collections::VecDeque;

pub const MAX_DIAGNOSTICS: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub source: &'static str,
    pub message: String,
}

#[derive(Default)]
pub struct Diagnostics {
    entries: RefCell<VecDeque<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, source: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(source, %message, "internal consistency violation");
        let mut entries = self.entries.borrow_mut();
        if entries.len() == MAX_DIAGNOSTICS {
            entries.pop_front();
        }
        entries.push_back(Diagnostic { source, message });
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Take every recorded diagnostic, oldest first, leaving the channel empty.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.borrow_mut()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reported_diagnostics_are_drained_once() {
        let diagnostics = Diagnostics::new();
        diagnostics.report("selection", "selection disagrees with selectors");
        assert_eq!(diagnostics.len(), 1);

        let drained = diagnostics.drain();
        assert_eq!(
            drained,
            vec![Diagnostic {
                source: "selection",
                message: "selection disagrees with selectors".to_string(),
            }]
        );
        assert!(diagnostics.is_empty());
        assert!(diagnostics.drain().is_empty());
    }

    #[test]
    fn oldest_entries_drop_past_the_cap() {
        let diagnostics = Diagnostics::new();
        for i in 0..MAX_DIAGNOSTICS + 3 {
            diagnostics.report("test", format!("violation {}", i));
        }
        assert_eq!(diagnostics.len(), MAX_DIAGNOSTICS);

        let drained = diagnostics.drain();
        assert_eq!(drained[0].message, "violation 3");
        assert_eq!(
            drained.last().unwrap().message,
            format!("violation {}", MAX_DIAGNOSTICS + 2)
        );
    }
}
