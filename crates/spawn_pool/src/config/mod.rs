//! Configuration system
//!
//! [`SpawnerConfig`] controls the behaviour of a [`Spawner`](crate::spawner::Spawner)
//! and can be loaded from TOML or RON files through the [`Config`] trait.

use std::collections::BTreeMap;

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// What the spawner does with an object it cannot return to any pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmanagedDespawnPolicy {
    /// Destroy the object through the host
    #[default]
    Destroy,
    /// Deactivate the object and leave it alive
    Deactivate,
    /// Leave the object untouched and report an error
    Reject,
}

/// Spawner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Policy for despawning objects no pool owns
    pub unmanaged_despawn: UnmanagedDespawnPolicy,

    /// Instances to prespawn when a pool is first created, keyed by template name
    pub prespawn: BTreeMap<String, usize>,

    /// Capacity hint for the instance lists of each new pool
    pub initial_capacity: usize,

    /// Default log filter for binaries (overridden by `RUST_LOG`)
    pub log_filter: Option<String>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            unmanaged_despawn: UnmanagedDespawnPolicy::default(),
            prespawn: BTreeMap::new(),
            initial_capacity: 16,
            log_filter: None,
        }
    }
}

impl Config for SpawnerConfig {}

impl SpawnerConfig {
    /// Set the unmanaged despawn policy
    pub fn with_unmanaged_despawn(mut self, policy: UnmanagedDespawnPolicy) -> Self {
        self.unmanaged_despawn = policy;
        self
    }

    /// Prespawn `count` instances of `template` when its pool is created
    pub fn with_prespawn(mut self, template: impl Into<String>, count: usize) -> Self {
        self.prespawn.insert(template.into(), count);
        self
    }

    /// Configured warm-up count for a template
    pub fn prespawn_count(&self, template: &str) -> usize {
        self.prespawn.get(template).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SpawnerConfig::default();

        assert_eq!(config.unmanaged_despawn, UnmanagedDespawnPolicy::Destroy);
        assert!(config.prespawn.is_empty());
        assert_eq!(config.prespawn_count("Enemy"), 0);
    }

    #[test]
    fn test_parse_toml() {
        let source = r#"
            unmanaged_despawn = "reject"
            initial_capacity = 4

            [prespawn]
            Enemy = 8
            Bullet = 32
        "#;

        let config: SpawnerConfig = toml::from_str(source).expect("valid toml");
        assert_eq!(config.unmanaged_despawn, UnmanagedDespawnPolicy::Reject);
        assert_eq!(config.initial_capacity, 4);
        assert_eq!(config.prespawn_count("Bullet"), 32);
        assert_eq!(config.log_filter, None);
    }

    #[test]
    fn test_save_and_load_ron() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("spawner.ron");
        let path = path.to_str().expect("utf-8 path");

        let config = SpawnerConfig::default()
            .with_unmanaged_despawn(UnmanagedDespawnPolicy::Deactivate)
            .with_prespawn("Enemy", 3);
        config.save_to_file(path).expect("save");

        let loaded = SpawnerConfig::load_from_file(path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_format() {
        let result = SpawnerConfig::default().save_to_file("spawner.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
