//! Configuration loading and typed config structures for Ascendance.
//!
//! The canonical configuration lives in `ascendance-config.yaml` next to the
//! engine binary. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and parses the file.
//! Every field has a default, so an empty or missing file is valid.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::offline::OFFLINE_THRESHOLD_SECONDS;

/// Name of the single key the save blob is stored under.
pub const DEFAULT_SAVE_KEY: &str = "ascendance-storage";

/// Environment variable overriding [`SaveConfig::directory`].
pub const SAVE_DIR_ENV: &str = "ASCENDANCE_SAVE_DIR";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Frame driver settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Offline catch-up settings.
    #[serde(default)]
    pub offline: OfflineConfig,

    /// Save location.
    #[serde(default)]
    pub save: SaveConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `ASCENDANCE_SAVE_DIR` overrides `save.directory`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml yields an error for a fully empty document.
        if yaml.trim().is_empty() {
            let mut config = Self::default();
            config.save.apply_env_overrides();
            return Ok(config);
        }
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.save.apply_env_overrides();
        Ok(config)
    }
}

/// Frame driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Milliseconds between frames.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Start playing immediately instead of waiting for a `start` command.
    #[serde(default)]
    pub auto_start: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            auto_start: false,
        }
    }
}

/// Offline catch-up configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OfflineConfig {
    /// Elapsed seconds that must be strictly exceeded before catch-up runs.
    #[serde(default = "default_offline_threshold_seconds")]
    pub threshold_seconds: u64,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            threshold_seconds: default_offline_threshold_seconds(),
        }
    }
}

/// Where the save blob lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveConfig {
    /// Directory holding save files.
    #[serde(default = "default_save_directory")]
    pub directory: PathBuf,

    /// Key (file stem) of the save blob.
    #[serde(default = "default_save_key")]
    pub key: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: default_save_directory(),
            key: default_save_key(),
        }
    }
}

impl SaveConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(SAVE_DIR_ENV)
            && !dir.is_empty()
        {
            self.directory = PathBuf::from(dir);
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_frame_interval_ms() -> u64 {
    16
}

const fn default_offline_threshold_seconds() -> u64 {
    OFFLINE_THRESHOLD_SECONDS
}

fn default_save_directory() -> PathBuf {
    PathBuf::from("saves")
}

fn default_save_key() -> String {
    DEFAULT_SAVE_KEY.to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
