#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for addonhub
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/addonhub/config.toml)
//! - Environment variables
//! - CLI flags
//!
//! It also owns the two pieces of persisted local state the CLI reads: the
//! settings store (currently selected team) and the credentials file.

pub mod constants;
pub mod core;
pub mod credentials;
pub mod settings;

pub use core::{ApiConfig, NetworkConfig, PathConfig};
pub use credentials::{FileTokenProvider, StaticTokenProvider, TokenProvider};
pub use settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};

use addonhub_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::APP_DIR)
            .join(constants::CONFIG_FILE))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config");
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(url) = std::env::var(constants::ENV_API_URL) {
            if !url.is_empty() {
                self.api.url = url;
            }
        }

        if let Ok(timeout) = std::env::var(constants::ENV_TIMEOUT) {
            self.network.timeout = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: constants::ENV_TIMEOUT.to_string(),
                value: timeout,
            })?;
        }

        if let Ok(dir) = std::env::var(constants::ENV_DATA_DIR) {
            if !dir.is_empty() {
                self.paths.data_dir = Some(PathBuf::from(dir));
            }
        }

        Ok(())
    }

    /// Directory holding settings, credentials and logs
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory is configured and the platform
    /// provides none.
    pub fn data_dir(&self) -> Result<PathBuf, Error> {
        if let Some(dir) = &self.paths.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(constants::APP_DIR))
            .ok_or_else(|| ConfigError::NoDataDir.into())
    }

    /// Get the log directory
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined.
    pub fn logs_dir(&self) -> Result<PathBuf, Error> {
        Ok(self.data_dir()?.join(constants::LOGS_DIR))
    }
}
