use serde::{Deserialize, Serialize};

/// Widget-level switches, read from the `[widget]` table of the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetOptions {
    /// Ask the host to animate selector moves.
    pub animate_selectors: bool,
    /// Scroll the primary cell into view after keyboard selection.
    pub auto_scroll: bool,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        WidgetOptions {
            animate_selectors: false,
            auto_scroll: true,
        }
    }
}
