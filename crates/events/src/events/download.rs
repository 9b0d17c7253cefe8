use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Download-specific events for the event system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// Registry returned the asset location and digest
    MetadataResolved {
        reference: String,
        location: String,
        checksum: String,
    },

    /// Response headers received, body about to stream
    Started {
        url: String,
        total_bytes: Option<u64>,
    },

    /// Digest verified and the destination committed
    Completed {
        url: String,
        bytes_written: u64,
        digest: String,
        path: Option<PathBuf>,
    },

    /// A partial or mismatched file was removed
    RolledBack { path: PathBuf, reason: String },

    Failed {
        url: String,
        failure: FailureContext,
    },
}
