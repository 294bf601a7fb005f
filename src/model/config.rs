use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default urgency window in days
pub const DEFAULT_URGENCY_DAYS: u32 = 7;

/// Configuration from `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Todo file to use when `--file` is not given. A leading `~/` expands
    /// to the home directory.
    #[serde(default)]
    pub file: Option<String>,
    /// Tasks due within this many days are escalated to priority C
    #[serde(default = "default_urgency_days")]
    pub urgency_days: u32,
    /// Colorize `list` output
    #[serde(default = "default_true")]
    pub color: bool,
    /// Palette overrides as `#RRGGBB`, keyed by theme slot
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            file: None,
            urgency_days: DEFAULT_URGENCY_DAYS,
            color: true,
            colors: HashMap::new(),
        }
    }
}

fn default_urgency_days() -> u32 {
    DEFAULT_URGENCY_DAYS
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.file, None);
        assert_eq!(config.urgency_days, 7);
        assert!(config.color);
        assert!(config.colors.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config: Config = toml::from_str(
            r##"
file = "~/notes/todo.txt"
urgency_days = 3
color = false

[colors]
priority_a = "#FF0000"
"##,
        )
        .unwrap();
        assert_eq!(config.file.as_deref(), Some("~/notes/todo.txt"));
        assert_eq!(config.urgency_days, 3);
        assert!(!config.color);
        assert_eq!(config.colors.get("priority_a").map(String::as_str), Some("#FF0000"));
    }
}
