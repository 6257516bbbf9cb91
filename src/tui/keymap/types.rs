use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gridkit_core::Vector;
use serde_json::{Value, json};

/// A named set of key bindings.
///
/// gridkit ships two built-in keymaps:
/// - `standard`: arrows, Tab, Ctrl+arrows, Home/End, Ctrl+A
/// - `vim`: the standard bindings plus hjkl, HJKL edges and 0/$/g/G borders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keymap {
    pub name: String,
    pub description: Option<String>,
    pub bindings: Vec<Binding>,
}

impl Keymap {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status_hint(&self) -> String {
        match self.name.as_str() {
            "standard" => {
                "arrows/Tab:move  C-arrows:edge  Home/End:border  C-a:all  drag:range  q:quit".to_string()
            }
            "vim" => "hjkl:move  HJKL:edge  0/$/g/G:border  C-a:all  drag:range  q:quit".to_string(),
            _ => format!("keymap: {}  q:quit", self.name),
        }
    }

    /// Find the action bound to `key`. Bindings with modifiers win over
    /// plain ones so that `C-Left` is not shadowed by `Left`.
    pub fn translate(&self, key: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .filter(|binding| !binding.combo.modifiers.is_empty())
            .find(|binding| binding.combo.matches(key))
            .or_else(|| {
                self.bindings
                    .iter()
                    .filter(|binding| binding.combo.modifiers.is_empty())
                    .find(|binding| binding.combo.matches(key))
            })
            .map(|binding| binding.action)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub combo: KeyCombo,
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    fn matches(&self, key: KeyEvent) -> bool {
        if self.code != key.code {
            return false;
        }
        if self.modifiers.is_empty() {
            return true;
        }
        key.modifiers.contains(self.modifiers)
    }

    pub fn display(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("C");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("M");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("S");
        }
        let key = match self.code {
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            _ => "Unknown".to_string(),
        };
        if parts.is_empty() {
            key
        } else {
            format!("{}-{}", parts.join("-"), key)
        }
    }
}

/// Actions that can be triggered by key presses.
///
/// Every action except [`Action::Quit`] runs a selection command through the
/// kernel by name, so anything a key can do is also reachable by other
/// modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Leave the application.
    Quit,
    /// Abort a live drag gesture.
    Cancel,
    /// Select every cell.
    SelectAll,
    /// Drop the selection.
    ClearSelection,
    /// Select the adjacent cell in a direction.
    Neighbor(Vector),
    /// Jump to the end of the data run in a direction.
    Edge(Vector),
    /// Jump to the grid border in a direction.
    Border(Vector),
}

pub(crate) const DIRECTIONS: [(&str, Vector); 8] = [
    ("north", Vector::NORTH),
    ("south", Vector::SOUTH),
    ("east", Vector::EAST),
    ("west", Vector::WEST),
    ("northeast", Vector::NORTH_EAST),
    ("northwest", Vector::NORTH_WEST),
    ("southeast", Vector::SOUTH_EAST),
    ("southwest", Vector::SOUTH_WEST),
];

fn direction_name(direction: Vector) -> &'static str {
    DIRECTIONS
        .iter()
        .find(|(_, vector)| *vector == direction)
        .map_or("?", |(name, _)| name)
}

impl Action {
    /// The kernel command and arguments this action runs.
    pub fn command(&self) -> Option<(&'static str, Value)> {
        match self {
            Action::Quit => None,
            Action::Cancel => Some(("cancelSelectGesture", Value::Null)),
            Action::SelectAll => Some(("selectAll", Value::Null)),
            Action::ClearSelection => Some(("select", json!({ "cells": [] }))),
            Action::Neighbor(direction) => Some(("selectNeighbor", json!(direction))),
            Action::Edge(direction) => Some(("selectEdge", json!(direction))),
            Action::Border(direction) => Some(("selectBorder", json!(direction))),
        }
    }

    /// Name used in keymap files.
    pub fn name(&self) -> String {
        match self {
            Action::Quit => "quit".to_string(),
            Action::Cancel => "cancel".to_string(),
            Action::SelectAll => "select_all".to_string(),
            Action::ClearSelection => "clear_selection".to_string(),
            Action::Neighbor(direction) => format!("neighbor_{}", direction_name(*direction)),
            Action::Edge(direction) => format!("edge_{}", direction_name(*direction)),
            Action::Border(direction) => format!("border_{}", direction_name(*direction)),
        }
    }
}
