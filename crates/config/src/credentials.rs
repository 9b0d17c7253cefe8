//! Credential acquisition
//!
//! An API key exported in the environment wins; otherwise the credential
//! saved by the login flow is read from `<data_dir>/credentials.toml`:
//!
//! ```toml
//! type = "session"
//! token = "..."
//! ```

use addonhub_errors::{AuthError, ConfigError, Error};
use addonhub_types::{Credential, CredentialType};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::constants::{CREDENTIALS_FILE, ENV_API_KEY};

/// Supplies the credential for one invocation
pub trait TokenProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if no usable credential is available.
    fn credential(&self) -> Result<Credential, Error>;
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(rename = "type")]
    kind: String,
    token: String,
}

/// Reads `ADDONHUB_API_KEY`, then the credentials file
#[derive(Debug, Clone)]
pub struct FileTokenProvider {
    path: PathBuf,
}

impl FileTokenProvider {
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(CREDENTIALS_FILE),
        }
    }

    fn read_file(&self) -> Result<Credential, Error> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AuthError::TokenUnavailable {
                    message: format!("not logged in ({} not found)", self.path.display()),
                }
                .into());
            }
            Err(e) => {
                return Err(ConfigError::ReadError {
                    key: CREDENTIALS_FILE.to_string(),
                    error: e.to_string(),
                }
                .into());
            }
        };

        let file: CredentialsFile = toml::from_str(&contents)?;
        let kind: CredentialType = file.kind.parse()?;
        if file.token.is_empty() {
            return Err(AuthError::TokenUnavailable {
                message: format!("empty token in {}", self.path.display()),
            }
            .into());
        }
        Ok(Credential::new(file.token, kind))
    }
}

impl TokenProvider for FileTokenProvider {
    fn credential(&self) -> Result<Credential, Error> {
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            if !key.is_empty() {
                tracing::debug!("using API key from environment");
                return Ok(Credential::new(key, CredentialType::ApiKey));
            }
        }
        self.read_file()
    }
}

/// Always returns the same credential
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    credential: Credential,
}

impl StaticTokenProvider {
    #[must_use]
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn credential(&self) -> Result<Credential, Error> {
        Ok(self.credential.clone())
    }
}
