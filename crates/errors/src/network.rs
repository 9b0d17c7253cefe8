//! Network-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum NetworkError {
    #[error("failed to get team addon metadata: {message}")]
    MetadataRequestFailed { message: String },

    #[error("failed to read team addon metadata: HTTP {status}: {message}")]
    MetadataHttpError { status: u16, message: String },

    #[error("failed to list teams: {message}")]
    TeamListFailed { message: String },

    #[error("failed to list teams: HTTP {status}: {message}")]
    TeamListHttpError { status: u16, message: String },

    #[error("failed to make download request: {message}")]
    DownloadRequestFailed { url: String, message: String },

    #[error("addon download failed: {status} {url}")]
    DownloadHttpError { status: u16, url: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("failed to create hub client: {0}")]
    ClientInit(String),
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MetadataRequestFailed { .. }
            | Self::TeamListFailed { .. }
            | Self::DownloadRequestFailed { .. } => {
                Some("Check your network connection and the registry URL.")
            }
            Self::MetadataHttpError { status: 401 | 403, .. }
            | Self::TeamListHttpError { status: 401 | 403, .. } => {
                Some("Your credential was rejected; log in again or use a valid API key.")
            }
            Self::MetadataHttpError { status: 404, .. } => {
                Some("Verify the addon team, type, name and version.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::MetadataRequestFailed { .. }
            | Self::TeamListFailed { .. }
            | Self::DownloadRequestFailed { .. } => true,
            Self::MetadataHttpError { status, .. }
            | Self::TeamListHttpError { status, .. }
            | Self::DownloadHttpError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::MetadataRequestFailed { .. } => "network.metadata_request_failed",
            Self::MetadataHttpError { .. } => "network.metadata_http_error",
            Self::TeamListFailed { .. } => "network.team_list_failed",
            Self::TeamListHttpError { .. } => "network.team_list_http_error",
            Self::DownloadRequestFailed { .. } => "network.download_request_failed",
            Self::DownloadHttpError { .. } => "network.download_http_error",
            Self::InvalidUrl(_) => "network.invalid_url",
            Self::ClientInit(_) => "network.client_init",
        };
        Some(code)
    }
}
