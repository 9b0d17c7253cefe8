//! Structured logging integration for events
//!
//! Every event that reaches the CLI is also recorded through `tracing` with
//! its payload as structured fields, so a `--debug` log file carries the full
//! history of a run.

use addonhub_events::{AppEvent, DownloadEvent, GeneralEvent, TeamEvent};
use tracing::{error, info, warn};

/// Log an `AppEvent` at the level matching its domain and outcome
pub fn log_event_with_tracing(event: &AppEvent) {
    match event {
        AppEvent::General(general) => match general {
            GeneralEvent::OperationStarted { operation } => {
                info!(operation = %operation, "Operation started");
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(operation = %operation, success = success, "Operation completed");
            }
        },

        AppEvent::Team(team_event) => match team_event {
            TeamEvent::Resolved { team, source } => {
                info!(team = %team, source = %source, "Team resolved");
            }
            TeamEvent::Switched { team } => info!(team = %team, "Team switched"),
        },

        AppEvent::Download(download_event) => match download_event {
            DownloadEvent::MetadataResolved {
                reference,
                location,
                checksum,
            } => {
                info!(
                    reference = %reference,
                    location = %location,
                    checksum = %checksum,
                    "Addon metadata resolved"
                );
            }
            DownloadEvent::Started { url, total_bytes } => {
                info!(url = %url, total_bytes = ?total_bytes, "Download started");
            }
            DownloadEvent::Completed {
                url,
                bytes_written,
                digest,
                path,
            } => {
                info!(
                    url = %url,
                    bytes_written = bytes_written,
                    digest = %digest,
                    path = ?path,
                    "Download completed"
                );
            }
            DownloadEvent::RolledBack { path, reason } => {
                warn!(path = %path.display(), reason = %reason, "Download rolled back");
            }
            DownloadEvent::Failed { url, failure } => {
                error!(
                    url = %url,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Download failed"
                );
            }
        },
    }
}
