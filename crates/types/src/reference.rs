//! Addon reference parsing
//!
//! An addon is addressed as `team/type/name@version`, for example
//! `acme/transformation/foo@v1.2.3`.

use addonhub_errors::ReferenceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The type segment of an addon reference
///
/// Kinds the registry is known to serve get their own variant; anything else
/// is carried through verbatim and left for the registry to judge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonKind {
    Transformation,
    Visualization,
    #[serde(untagged)]
    Other(String),
}

impl AddonKind {
    /// Wire representation used in registry URLs
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Transformation => "transformation",
            Self::Visualization => "visualization",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for AddonKind {
    fn from(s: &str) -> Self {
        match s {
            "transformation" => Self::Transformation,
            "visualization" => Self::Visualization,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AddonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully qualified addon version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddonReference {
    pub team: String,
    pub kind: AddonKind,
    pub name: String,
    pub version: String,
}

impl AddonReference {
    /// Parse a `team/type/name@version` string
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::InvalidReference`] if the string does not have
    /// exactly three `/` segments, exactly one `@` in the last segment, or has an
    /// empty team, type or name. Returns [`ReferenceError::InvalidVersion`] if
    /// the version does not start with `v`.
    pub fn parse(raw: &str) -> Result<Self, ReferenceError> {
        let invalid = |reason: &str| ReferenceError::InvalidReference {
            reference: raw.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = raw.split('/').collect();
        let [team, kind, name_version] = parts.as_slice() else {
            return Err(invalid("expected addon-team/addon-type/addon-name@version"));
        };

        let name_parts: Vec<&str> = name_version.split('@').collect();
        let [name, version] = name_parts.as_slice() else {
            return Err(invalid("no version specified"));
        };

        if !version.starts_with('v') {
            return Err(ReferenceError::InvalidVersion {
                reference: raw.to_string(),
            });
        }

        if team.is_empty() || kind.is_empty() || name.is_empty() {
            return Err(invalid("team, type and name must not be empty"));
        }

        Ok(Self {
            team: (*team).to_string(),
            kind: AddonKind::from(*kind),
            name: (*name).to_string(),
            version: (*version).to_string(),
        })
    }
}

impl FromStr for AddonReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AddonReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}@{}",
            self.team, self.kind, self.name, self.version
        )
    }
}
