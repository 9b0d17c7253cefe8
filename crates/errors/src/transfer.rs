//! Transfer engine error types

use std::borrow::Cow;
use std::path::PathBuf;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum TransferError {
    #[error("file {} already exists{}", path.display(), if *is_dir { ": is a directory" } else { "" })]
    DestinationExists { path: PathBuf, is_dir: bool },

    #[error("failed to create file {}: {message}", path.display())]
    CreateFailed { path: PathBuf, message: String },

    #[error("failed to write: {message}")]
    TransferWriteFailed { message: String },

    #[error("failed to close: {message}")]
    TransferCloseFailed { message: String },

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

impl UserFacingError for TransferError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DestinationExists { .. } => {
                Some("Remove the existing file or choose another target directory.")
            }
            Self::ChecksumMismatch { .. } => {
                Some("The downloaded file was discarded; the artifact may be corrupted or tampered with.")
            }
            Self::CreateFailed { .. } => Some("Ensure the target directory exists and is writable."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::TransferWriteFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::DestinationExists { .. } => "transfer.destination_exists",
            Self::CreateFailed { .. } => "transfer.create_failed",
            Self::TransferWriteFailed { .. } => "transfer.write_failed",
            Self::TransferCloseFailed { .. } => "transfer.close_failed",
            Self::ChecksumMismatch { .. } => "transfer.checksum_mismatch",
        };
        Some(code)
    }
}
