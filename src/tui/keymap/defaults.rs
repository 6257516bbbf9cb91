use super::Keymap;
use super::parse::build_keymap;
use std::collections::HashMap;

pub(crate) const BUILTIN_KEYMAPS: [&str; 2] = ["standard", "vim"];

const STANDARD: &[(&str, &str)] = &[
    ("Up", "neighbor_north"),
    ("Down", "neighbor_south"),
    ("Left", "neighbor_west"),
    ("Right", "neighbor_east"),
    ("Tab", "neighbor_east"),
    ("BackTab", "neighbor_west"),
    ("S-Tab", "neighbor_west"),
    ("C-Up", "edge_north"),
    ("C-Down", "edge_south"),
    ("C-Left", "edge_west"),
    ("C-Right", "edge_east"),
    ("Home", "border_west"),
    ("End", "border_east"),
    ("C-Home", "border_northwest"),
    ("C-End", "border_southeast"),
    ("C-a", "select_all"),
    ("Esc", "cancel"),
    ("q", "quit"),
    ("C-c", "quit"),
];

const VIM_EXTRA: &[(&str, &str)] = &[
    ("h", "neighbor_west"),
    ("j", "neighbor_south"),
    ("k", "neighbor_north"),
    ("l", "neighbor_east"),
    ("H", "edge_west"),
    ("J", "edge_south"),
    ("K", "edge_north"),
    ("L", "edge_east"),
    ("0", "border_west"),
    ("$", "border_east"),
    ("g", "border_northwest"),
    ("G", "border_southeast"),
    ("x", "clear_selection"),
];

pub(crate) fn is_builtin_keymap(name: &str) -> bool {
    BUILTIN_KEYMAPS.contains(&name)
}

/// Build one of the shipped keymaps. Returns `None` for unknown names.
pub fn builtin_keymap(name: &str) -> Option<Keymap> {
    let (description, tables): (&str, &[&[(&str, &str)]]) = match name {
        "standard" => ("Arrow keys and Tab", &[STANDARD]),
        "vim" => ("Arrow keys plus hjkl", &[STANDARD, VIM_EXTRA]),
        _ => return None,
    };
    let raw: HashMap<String, String> = tables
        .iter()
        .flat_map(|table| table.iter())
        .map(|(combo, action)| (combo.to_string(), action.to_string()))
        .collect();
    build_keymap(name, Some(description.to_string()), &raw).ok()
}
