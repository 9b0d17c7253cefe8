#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for addonhub
//!
//! This crate handles every HTTP exchange: the authenticated registry calls
//! (team listing, addon download metadata) and the verified streaming
//! transfer of the addon asset itself. All of it runs under a shared
//! cancellation token.

mod client;
mod registry;
pub mod transfer;

pub use client::{NetClient, NetConfig, SendError};
pub use registry::{HubClient, TEAMS_PER_PAGE};
pub use transfer::{stream_verified, transfer, FileSink, Sink, WriterSink};

use addonhub_errors::{Error, NetworkError};
use url::Url;

/// Parse and validate an http(s) URL
///
/// # Errors
///
/// Returns [`NetworkError::InvalidUrl`] if the string does not parse or uses
/// another scheme.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(NetworkError::InvalidUrl(format!("unsupported scheme {scheme}: {url}")).into()),
    }
}
