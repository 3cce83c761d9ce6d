//! # Module Configuration
//!
//! The small startup config: a master switch and the data directory the
//! TOML store lives in. Reference data itself is not configuration; it
//! lives in the store and reloads at runtime.

use std::path::{Path, PathBuf};

use serde::Deserialize;

fn default_enabled() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/gatherxp")
}

/// Startup configuration for the gathering module.
#[derive(Clone, Debug, Deserialize)]
pub struct ModuleConfig {
    /// Master switch. When off, gather events are silent no-ops; the admin
    /// surface stays available so an operator can inspect and re-enable.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Directory holding the reference-data tables.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            data_dir: default_data_dir(),
        }
    }
}

impl ModuleConfig {
    /// Loads the config from a TOML file.
    ///
    /// A missing or unparseable file yields the defaults with a warning;
    /// configuration problems must not stop the host from booting.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Config file {} unreadable, using defaults: {}", path.display(), err);
                return Self::default();
            }
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Config file {} invalid, using defaults: {}", path.display(), err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModuleConfig::default();
        assert!(config.enabled);
        assert_eq!(config.data_dir, PathBuf::from("data/gatherxp"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ModuleConfig = toml::from_str("enabled = false").unwrap();
        assert!(!config.enabled);
        assert_eq!(config.data_dir, PathBuf::from("data/gatherxp"));
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let config = ModuleConfig::load(Path::new("/nonexistent/gatherxp.toml"));
        assert!(config.enabled);
    }
}
