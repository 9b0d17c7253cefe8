#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for addonhub
//!
//! This crate sits between the CLI and the library crates. Each operation
//! takes an [`OpsCtx`], acquires the credential, resolves the team scope
//! once, and then drives the registry and transfer calls under the context's
//! cancellation token.

mod context;
mod download;
mod shutdown;
mod switch;
mod team;
mod types;

pub use context::{OpsContextBuilder, OpsCtx};
pub use download::download_addon;
pub use shutdown::{termination_signal, Supervisor};
pub use switch::switch_team;
pub use team::{resolve_team, TeamDirectory};
pub use types::{AddonDownloadReport, TeamSwitchReport};

use addonhub_errors::Error;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Addon downloaded and verified
    AddonDownload(AddonDownloadReport),
    /// Current team changed
    TeamSwitched(TeamSwitchReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}
