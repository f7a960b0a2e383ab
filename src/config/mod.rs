//! Configuration management for gradle-pin

pub mod schema;

pub use schema::Config;

use crate::error::{PinError, PinResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the repository-local config file
pub const LOCAL_CONFIG_NAME: &str = ".gradle-pin.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradle-pin")
            .join("config.toml")
    }

    /// Get the state directory path
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradle-pin")
    }

    /// Get the fetch journal path
    pub fn fetch_journal_path() -> PathBuf {
        Self::state_dir().join("fetch.log")
    }

    /// Find a repository-local config in `start` or any of its ancestors
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, using defaults if the file does not exist
    pub fn load(&self) -> PinResult<Config> {
        self.load_merged(None)
    }

    /// Load the global config with a repository-local config layered on top.
    ///
    /// Tables are merged key by key; any value set locally wins.
    pub fn load_merged(&self, local: Option<&Path>) -> PinResult<Config> {
        let mut merged = toml::Value::Table(toml::Table::new());

        if self.config_path.exists() {
            merge_values(&mut merged, read_value(&self.config_path)?);
        } else {
            debug!(
                "Config file {} not found, using defaults",
                self.config_path.display()
            );
        }

        if let Some(path) = local {
            merge_values(&mut merged, read_value(path)?);
        }

        let origin = local.unwrap_or(&self.config_path);
        merged
            .try_into()
            .map_err(|e: toml::de::Error| PinError::ConfigInvalid {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn read_value(path: &Path) -> PinResult<toml::Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| PinError::io(format!("reading config from {}", path.display()), e))?;

    let table: toml::Table = toml::from_str(&content).map_err(|e| PinError::ConfigInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(toml::Value::Table(table))
}

/// Recursively merge `overlay` into `base`
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
