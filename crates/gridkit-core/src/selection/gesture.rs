//! Pointer-drag selection state.

use crate::cell_ref::CellRef;

/// A live drag: the cell under pointer-down and the cell last dragged over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gesture {
    pub start: CellRef,
    pub end: CellRef,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Active(Gesture),
}

impl GestureState {
    /// Start a gesture on `cell`, replacing any live one.
    pub fn begin(&mut self, cell: CellRef) {
        *self = GestureState::Active(Gesture {
            start: cell.clone(),
            end: cell,
        });
    }

    /// Move the gesture end. Returns the updated gesture only if the end
    /// actually changed.
    pub fn update(&mut self, cell: CellRef) -> Option<&Gesture> {
        match self {
            GestureState::Active(gesture) if gesture.end != cell => {
                gesture.end = cell;
                Some(&*gesture)
            }
            _ => None,
        }
    }

    /// Finish the gesture, returning it if one was live.
    pub fn end(&mut self) -> Option<Gesture> {
        match std::mem::take(self) {
            GestureState::Active(gesture) => Some(gesture),
            GestureState::Idle => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, GestureState::Active(_))
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        match self {
            GestureState::Active(gesture) => Some(gesture),
            GestureState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_idle_active_idle() {
        let mut state = GestureState::default();
        assert!(!state.is_active());

        state.begin(CellRef::from("B2"));
        assert_eq!(
            state.gesture(),
            Some(&Gesture {
                start: CellRef::from("B2"),
                end: CellRef::from("B2"),
            })
        );

        let ended = state.end().unwrap();
        assert_eq!(ended.start, CellRef::from("B2"));
        assert!(!state.is_active());
        assert!(state.end().is_none());
    }

    #[test]
    fn update_reports_only_real_changes() {
        let mut state = GestureState::default();
        assert!(state.update(CellRef::from("A1")).is_none());

        state.begin(CellRef::from("A1"));
        assert!(state.update(CellRef::from("A1")).is_none());
        let gesture = state.update(CellRef::from("C3")).unwrap();
        assert_eq!(gesture.end, CellRef::from("C3"));
        assert!(state.update(CellRef::from("C3")).is_none());
    }
}
