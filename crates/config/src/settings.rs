//! Persisted key/value settings
//!
//! Each key is stored as its own file under `<data_dir>/settings/`, so a key
//! that was never written simply has no file. Reading such a key yields
//! `None`; deciding whether that is a problem is left to the caller.

use addonhub_errors::{ConfigError, Error};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::constants::SETTINGS_DIR;

/// Read/write access to locally persisted settings
pub trait SettingsStore: Send + Sync {
    /// Look up a setting, `Ok(None)` when it was never set
    ///
    /// # Errors
    ///
    /// Returns an error if the setting exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Persist a setting, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

/// File-per-key settings store
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    dir: PathBuf,
}

impl FileSettingsStore {
    /// Store rooted at `<data_dir>/settings`
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join(SETTINGS_DIR),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(key, path = %path.display(), "setting not present");
                Ok(None)
            }
            Err(e) => Err(ConfigError::ReadError {
                key: key.to_string(),
                error: e.to_string(),
            }
            .into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.key_path(key);
        let write_error = |e: std::io::Error| ConfigError::WriteError {
            path: path.display().to_string(),
            error: e.to_string(),
        };
        std::fs::create_dir_all(&self.dir).map_err(write_error)?;
        std::fs::write(&path, value).map_err(write_error)?;
        tracing::debug!(key, path = %path.display(), "setting written");
        Ok(())
    }
}

/// In-process settings store, for embedding and tests
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
