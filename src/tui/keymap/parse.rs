use super::types::DIRECTIONS;
use super::{Action, Binding, KeyCombo, Keymap};
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

pub(crate) const MAX_BINDINGS: usize = 512;

/// Build a keymap from `"key" = "action"` pairs.
///
/// Pairs are processed in sorted key order so errors and duplicate
/// detection are deterministic.
pub fn build_keymap(
    name: &str,
    description: Option<String>,
    raw: &HashMap<String, String>,
) -> Result<Keymap, Vec<String>> {
    let mut errors: Vec<String> = Vec::new();
    if raw.len() > MAX_BINDINGS {
        errors.push(format!(
            "Too many bindings in keymap '{}': {} (max {})",
            name,
            raw.len(),
            MAX_BINDINGS
        ));
        return Err(errors);
    }

    let mut pairs: Vec<(&String, &String)> = raw.iter().collect();
    pairs.sort();

    let mut bindings: Vec<Binding> = Vec::new();
    for (combo_str, action_str) in pairs {
        match (parse_key_combo(combo_str), action_from_str(action_str)) {
            (Ok(combo), Some(action)) => {
                if bindings.iter().any(|binding| binding.combo == combo) {
                    errors.push(format!(
                        "Duplicate key '{}' in keymap '{}'",
                        combo.display(),
                        name
                    ));
                    continue;
                }
                bindings.push(Binding { combo, action });
            }
            (Ok(_), None) => errors.push(format!(
                "Invalid action '{}' in keymap '{}'",
                action_str, name
            )),
            (Err(err), _) => errors.push(format!(
                "Invalid key '{}' in keymap '{}': {}",
                combo_str, name, err
            )),
        }
    }

    if errors.is_empty() {
        Ok(Keymap {
            name: name.to_string(),
            description,
            bindings,
        })
    } else {
        Err(errors)
    }
}

pub(crate) fn parse_key_combo(input: &str) -> Result<KeyCombo, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty key".to_string());
    }
    if let Some(ch) = parse_single_char(trimmed) {
        return Ok(KeyCombo {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::empty(),
        });
    }

    let (mods, key_part) = if !trimmed.contains('-') {
        (KeyModifiers::empty(), trimmed)
    } else if let Some(mod_str) = trimmed.strip_suffix('-') {
        let mod_str = mod_str.trim_end_matches('-');
        if mod_str.is_empty() {
            return Err("missing modifier before '-'".to_string());
        }
        let modifiers = parse_modifiers(mod_str)?;
        (modifiers, "-")
    } else {
        let mut split = trimmed.rsplitn(2, '-');
        let key_part = split.next().ok_or_else(|| "empty key".to_string())?;
        let mod_str = split.next().unwrap_or_default();
        let modifiers = parse_modifiers(mod_str)?;
        (modifiers, key_part)
    };

    let key = parse_key_code(key_part)?;
    Ok(KeyCombo {
        code: key,
        modifiers: mods,
    })
}

fn parse_modifiers(input: &str) -> Result<KeyModifiers, String> {
    let mut modifiers = KeyModifiers::empty();
    for part in input.split('-') {
        let raw = part.trim();
        if raw.is_empty() {
            return Err("empty modifier segment".to_string());
        }
        let flag = match raw.to_ascii_lowercase().as_str() {
            "c" | "ctrl" | "control" => KeyModifiers::CONTROL,
            "m" | "alt" | "meta" => KeyModifiers::ALT,
            "s" | "shift" => KeyModifiers::SHIFT,
            _ => return Err(format!("unknown modifier '{}'", part)),
        };
        if modifiers.contains(flag) {
            return Err(format!("duplicate modifier '{}'", raw));
        }
        modifiers.insert(flag);
    }
    Ok(modifiers)
}

fn parse_key_code(input: &str) -> Result<KeyCode, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty key".to_string());
    }
    if let Some(ch) = parse_single_char(trimmed) {
        return Ok(KeyCode::Char(ch));
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "enter" => Ok(KeyCode::Enter),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" => Ok(KeyCode::PageUp),
        "pagedown" => Ok(KeyCode::PageDown),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "space" | "spc" => Ok(KeyCode::Char(' ')),
        "dash" | "minus" => Ok(KeyCode::Char('-')),
        "dollar" => Ok(KeyCode::Char('$')),
        _ => Err(format!("unknown key '{}'", input)),
    }
}

fn parse_single_char(input: &str) -> Option<char> {
    let mut chars = input.chars();
    let ch = chars.next()?;
    if chars.next().is_none() {
        Some(ch)
    } else {
        None
    }
}

pub(crate) fn action_from_str(input: &str) -> Option<Action> {
    let norm = input.trim().to_ascii_lowercase();
    match norm.as_str() {
        "quit" => return Some(Action::Quit),
        "cancel" => return Some(Action::Cancel),
        "select_all" => return Some(Action::SelectAll),
        "clear_selection" => return Some(Action::ClearSelection),
        _ => {}
    }
    let (kind, direction) = norm.split_once('_')?;
    let (_, vector) = DIRECTIONS.iter().find(|(name, _)| *name == direction)?;
    match kind {
        "neighbor" => Some(Action::Neighbor(*vector)),
        "edge" => Some(Action::Edge(*vector)),
        "border" => Some(Action::Border(*vector)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridkit_core::Vector;

    #[test]
    fn parse_key_combo_ctrl() {
        let combo = parse_key_combo("C-a").expect("combo");
        assert_eq!(combo.code, KeyCode::Char('a'));
        assert!(combo.modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn parse_key_combo_ctrl_named_key() {
        let combo = parse_key_combo("ctrl-Left").expect("combo");
        assert_eq!(combo.code, KeyCode::Left);
        assert_eq!(combo.modifiers, KeyModifiers::CONTROL);
    }

    #[test]
    fn parse_key_combo_dash() {
        let combo = parse_key_combo("-").expect("combo");
        assert_eq!(combo.code, KeyCode::Char('-'));
        assert!(combo.modifiers.is_empty());
    }

    #[test]
    fn parse_key_combo_ctrl_dash() {
        let combo = parse_key_combo("C--").expect("combo");
        assert_eq!(combo.code, KeyCode::Char('-'));
        assert!(combo.modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn parse_key_combo_rejects_bad_input() {
        assert!(parse_key_combo("C-NotAKey").unwrap_err().contains("unknown key"));
        assert!(parse_key_combo("--").unwrap_err().contains("missing modifier"));
        assert!(parse_key_combo("C-C-s").unwrap_err().contains("duplicate modifier"));
        assert!(parse_key_combo("X-s").unwrap_err().contains("unknown modifier"));
    }

    #[test]
    fn action_names_round_trip() {
        for action in [
            Action::Quit,
            Action::SelectAll,
            Action::Neighbor(Vector::SOUTH_WEST),
            Action::Edge(Vector::NORTH),
            Action::Border(Vector::SOUTH_EAST),
        ] {
            assert_eq!(action_from_str(&action.name()), Some(action));
        }
        assert_eq!(action_from_str("Edge_East"), Some(Action::Edge(Vector::EAST)));
        assert_eq!(action_from_str("edge_up"), None);
        assert_eq!(action_from_str("jump_east"), None);
    }

    #[test]
    fn build_keymap_reports_every_problem() {
        let raw: HashMap<String, String> = [
            ("C-s", "select_all"),
            ("ctrl-s", "quit"),
            ("q", "explode"),
            ("C-Nope", "quit"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let errors = build_keymap("broken", None, &raw).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Duplicate key 'C-s'")));
        assert!(errors.iter().any(|e| e.contains("Invalid action 'explode'")));
        assert!(errors.iter().any(|e| e.contains("Invalid key 'C-Nope'")));
    }

    #[test]
    fn build_keymap_accepts_valid_bindings() {
        let raw: HashMap<String, String> = [("C-Right", "edge_east"), ("x", "select_all")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let keymap = build_keymap("mine", Some("test".to_string()), &raw).unwrap();
        assert_eq!(keymap.bindings.len(), 2);
        assert_eq!(keymap.description.as_deref(), Some("test"));
    }
}
