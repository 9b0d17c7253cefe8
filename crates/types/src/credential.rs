//! Credentials and the team scope they resolve to

use addonhub_errors::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a credential was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialType {
    /// Interactive login token, scoped by the locally selected team
    #[serde(rename = "session")]
    SessionToken,
    /// API key, scoped by the teams the registry assigns to it
    ApiKey,
}

impl FromStr for CredentialType {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(Self::SessionToken),
            "api_key" => Ok(Self::ApiKey),
            other => Err(AuthError::UnsupportedCredentialType {
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionToken => write!(f, "session"),
            Self::ApiKey => write!(f, "api_key"),
        }
    }
}

/// An opaque bearer value and its type tag
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
    kind: CredentialType,
}

impl Credential {
    #[must_use]
    pub fn new(value: impl Into<String>, kind: CredentialType) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    #[must_use]
    pub fn kind(&self) -> CredentialType {
        self.kind
    }

    /// The raw bearer value, for the `Authorization` header only
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &"<redacted>")
            .field("kind", &self.kind)
            .finish()
    }
}

/// The single team all registry calls of one invocation are scoped to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamScope(String);

impl TeamScope {
    #[must_use]
    pub fn new(team: impl Into<String>) -> Self {
        Self(team.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
