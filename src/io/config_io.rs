use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("todo").join("config.toml")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Todo file used when neither `--file` nor the config names one
pub fn default_todo_file() -> PathBuf {
    dirs_home().join("Documents").join("todo.txt")
}

/// Read the config from a specific path. A missing file yields defaults;
/// an unreadable or malformed one is an error.
pub fn read_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read the config from the default location.
pub fn read_config() -> Result<Config, ConfigError> {
    read_config_from(&config_path())
}

/// Resolve the todo file: `--file` beats the config, which beats the default
pub fn resolve_todo_file(cli_file: Option<&str>, config: &Config) -> PathBuf {
    cli_file
        .or(config.file.as_deref())
        .map(expand_home)
        .unwrap_or_else(default_todo_file)
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        dirs_home()
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs_home().join(rest)
    } else {
        PathBuf::from(path)
    }
}
