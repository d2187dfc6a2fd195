use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle window before a requested focus move is applied
    #[serde(default = "default_focus_debounce_ms")]
    pub focus_debounce_ms: u64,
    /// Show the key hint line under the list
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Color overrides, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            focus_debounce_ms: default_focus_debounce_ms(),
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// trace|debug|info|warn|error (absent = info)
    #[serde(default)]
    pub level: Option<String>,
}

fn default_focus_debounce_ms() -> u64 {
    30
}

fn default_true() -> bool {
    true
}
