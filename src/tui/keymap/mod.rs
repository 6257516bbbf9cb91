//! Keymap translation layer.
//!
//! Keys map to [`Action`]s, and actions map to kernel commands, so the
//! terminal front end never calls the selection module directly.
//! - `standard` uses arrows, Tab, Home/End and Ctrl combinations.
//! - `vim` adds hjkl-style letter keys on top of `standard`.

mod defaults;
mod parse;
mod types;

pub use defaults::builtin_keymap;
pub(crate) use defaults::is_builtin_keymap;
pub use parse::build_keymap;
pub use types::{Action, Binding, KeyCombo, Keymap};
