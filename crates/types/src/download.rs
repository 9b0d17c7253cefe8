//! Download descriptors, destinations and outcomes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Selector value that routes a download to standard output
pub const STDOUT_TARGET: &str = "-";

/// Where an addon lives and what it must hash to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadDescriptor {
    pub location: Url,
    /// Lower-case hex SHA-256 as supplied by the registry
    pub checksum: String,
}

/// Destination selected on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Stdout,
    Directory(PathBuf),
}

impl Target {
    #[must_use]
    pub fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        if s == STDOUT_TARGET {
            Self::Stdout
        } else {
            Self::Directory(PathBuf::from(s))
        }
    }
}

impl From<&Path> for Target {
    fn from(path: &Path) -> Self {
        if path.as_os_str() == STDOUT_TARGET {
            Self::Stdout
        } else {
            Self::Directory(path.to_path_buf())
        }
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::Directory(PathBuf::from("."))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Outcome of a committed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    pub bytes_written: u64,
    pub digest: String,
    /// Final file path, absent when streamed to stdout
    pub path: Option<PathBuf>,
}
