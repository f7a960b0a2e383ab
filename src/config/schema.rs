//! Configuration schema for gradle-pin
//!
//! Configuration is read from `~/.config/gradle-pin/config.toml` and from a
//! repository-local `.gradle-pin.toml`, the latter taking precedence.

use crate::cache::store::DEFAULT_STORE_URL;
use crate::cache::PresencePolicy;
use crate::env::DEFAULT_MEMORY_OPTS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Remote store settings
    pub store: StoreConfig,

    /// Local cache settings
    pub cache: CacheConfig,

    /// JDK selection
    pub jdk: JdkConfig,

    /// Gradle invocation settings
    pub gradle: GradleConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Record completed fetches in the fetch journal
    pub fetch_journal: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            fetch_journal: true,
        }
    }
}

/// Remote store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL (`https://...`) or mirror directory (`file://...` or a path)
    pub url: String,

    /// Whole-transfer timeout in seconds; unset means no timeout
    pub timeout_secs: Option<u64>,
}

impl StoreConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STORE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Local cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Third-party directory, relative to the repository root
    pub third_party: PathBuf,

    /// How materialized artifacts are judged present
    pub policy: PresencePolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            third_party: PathBuf::from("third_party"),
            policy: PresencePolicy::Presence,
        }
    }
}

/// JDK configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JdkConfig {
    /// JDK Gradle itself runs on
    pub default: String,

    /// Every JDK fetched before Gradle runs, in order
    pub variants: Vec<String>,
}

impl Default for JdkConfig {
    fn default() -> Self {
        Self {
            default: "jdk-21".to_string(),
            variants: vec![
                "jdk-11".to_string(),
                "jdk-17".to_string(),
                "jdk-21".to_string(),
            ],
        }
    }
}

/// Gradle invocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradleConfig {
    /// Value of `GRADLE_OPTS` for the Gradle client
    pub memory_opts: String,

    /// Pass `--offline`
    pub offline: bool,

    /// Settings file passed with `-c=`, relative to the repository root
    pub settings_file: Option<PathBuf>,

    /// Gradle user home used with `--worktree`, relative to the repository root
    pub worktree_user_home: PathBuf,
}

impl Default for GradleConfig {
    fn default() -> Self {
        Self {
            memory_opts: DEFAULT_MEMORY_OPTS.to_string(),
            offline: true,
            settings_file: Some(PathBuf::from("d8_r8/settings.gradle.kts")),
            worktree_user_home: PathBuf::from(".gradle_user_home"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[store]"));
        assert!(toml.contains("[gradle]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.store.url, DEFAULT_STORE_URL);
        assert_eq!(config.jdk.default, "jdk-21");
        assert_eq!(config.cache.policy, PresencePolicy::Presence);
        assert!(config.store.timeout().is_none());
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [store]
            url = "file:///srv/mirror"
            timeout_secs = 30

            [cache]
            policy = "timestamp"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.store.url, "file:///srv/mirror");
        assert_eq!(config.store.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.cache.policy, PresencePolicy::Timestamp);
        assert_eq!(config.gradle.memory_opts, "-Xmx1g"); // default preserved
    }

    #[test]
    fn config_rejects_unknown_policy() {
        let result: Result<Config, _> = toml::from_str("[cache]\npolicy = \"always\"\n");
        assert!(result.is_err());
    }
}
