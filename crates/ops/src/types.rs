//! Types for operations and results

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What `addon download` reports once the file is verified and committed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonDownloadReport {
    /// Reference as typed, `team/type/name@version`
    pub reference: String,
    /// Team the registry lookup was scoped to
    pub team: String,
    /// Where the asset was fetched from
    pub location: String,
    pub bytes_written: u64,
    /// Lower-case hex SHA-256 of the bytes written
    pub digest: String,
    /// Final file path, absent when written to stdout
    pub path: Option<PathBuf>,
}

/// Outcome of `switch`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSwitchReport {
    pub team: String,
    /// Team that was selected before, if any
    pub previous: Option<String>,
}
