//! Configuration file helpers for the Mailosaur client
//!
//! Locates and parses JSON configuration files in the shared config
//! directory (~/.config/mailosaur/).

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Name of the config directory under the platform config root
const DIR_NAME: &str = "mailosaur";

/// Get the Mailosaur config directory (~/.config/mailosaur/)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(DIR_NAME))
}

/// Get the path to a config file within the Mailosaur config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Check if a config file exists in the Mailosaur config directory
pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|p| p.exists())
}

/// Load and parse a JSON config file from the Mailosaur config directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let path = config_path(filename).context("Could not determine config directory")?;
    load_json_file(&path)
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
