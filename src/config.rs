//! User configuration: `keymaps.toml` in the platform config directory.
//!
//! ```toml
//! [meta]
//! default = "mine"
//!
//! [widget]
//! auto_scroll = true
//!
//! [keymaps.mine]
//! description = "arrows only"
//! bindings = { "Up" = "neighbor_north", "C-Up" = "edge_north" }
//! ```
//!
//! Loading never fails: problems are returned as warnings and the built-in
//! keymap and default widget options are used instead.

use crate::tui::keymap::{Keymap, build_keymap, builtin_keymap, is_builtin_keymap};
use directories::ProjectDirs;
use gridkit_core::WidgetOptions;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const FALLBACK_KEYMAP: &str = "standard";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    meta: Option<ConfigMeta>,
    widget: Option<WidgetOptions>,
    keymaps: Option<HashMap<String, KeymapFile>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigMeta {
    default: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeymapFile {
    description: Option<String>,
    bindings: Option<HashMap<String, String>>,
}

/// Everything the application reads from disk at startup.
#[derive(Debug)]
pub struct Config {
    pub keymap: Keymap,
    pub options: WidgetOptions,
    pub warnings: Vec<String>,
}

pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gridkit").map(|dirs| dirs.config_dir().join("keymaps.toml"))
}

/// Resolve the keymap named `requested` (or the file's default) against
/// `config_file` or, when none is given, the user config path.
pub fn load_config(requested: Option<&str>, config_file: Option<&Path>) -> Config {
    let mut warnings: Vec<String> = Vec::new();
    let config_path = config_file.map(Path::to_path_buf).or_else(user_config_path);
    let file = config_path
        .as_deref()
        .and_then(|path| read_config_file(path, config_file.is_some(), &mut warnings));

    let options = file
        .as_ref()
        .and_then(|f| f.widget)
        .unwrap_or_default();

    let requested_name = requested.map(str::trim).filter(|s| !s.is_empty());
    let default_name = file
        .as_ref()
        .and_then(|f| f.meta.as_ref())
        .and_then(|m| m.default.as_deref());
    let target = requested_name.or(default_name).unwrap_or(FALLBACK_KEYMAP);
    let source = config_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "keymaps.toml".to_string());

    let custom = file.as_ref().and_then(|f| f.keymaps.as_ref()).and_then(|k| k.get(target));
    if let Some(entry) = custom {
        let bindings = entry.bindings.clone().unwrap_or_default();
        match build_keymap(target, entry.description.clone(), &bindings) {
            Ok(keymap) => {
                tracing::debug!(keymap = target, bindings = keymap.bindings.len(), "custom keymap");
                return Config {
                    keymap,
                    options,
                    warnings,
                };
            }
            Err(errs) => warnings.extend(errs),
        }
    } else if !is_builtin_keymap(target) {
        warnings.push(format!(
            "Keymap '{}' not found in {}; falling back to built-in '{}'",
            target, source, FALLBACK_KEYMAP
        ));
    }

    let keymap = builtin_keymap(target)
        .or_else(|| builtin_keymap(FALLBACK_KEYMAP))
        .unwrap_or_else(|| Keymap {
            name: FALLBACK_KEYMAP.to_string(),
            description: None,
            bindings: Vec::new(),
        });

    Config {
        keymap,
        options,
        warnings,
    }
}

fn read_config_file(path: &Path, explicit: bool, warnings: &mut Vec<String>) -> Option<ConfigFile> {
    if !path.exists() {
        if explicit {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return None;
    }
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ConfigFile>(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    }
}
