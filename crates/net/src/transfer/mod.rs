//! Verified asset transfer
//!
//! Fetches the asset a [`DownloadDescriptor`] points at and streams it into a
//! [`Target`], hashing as it goes. File destinations are created exclusively
//! and removed again unless the SHA-256 digest matches.

mod sink;
mod stream;
mod validation;

pub use sink::{FileSink, Sink, WriterSink};
pub use stream::stream_verified;

use addonhub_errors::{Error, NetworkError};
use addonhub_events::{AppEvent, DownloadEvent, EventEmitter, EventSender};
use addonhub_types::{DownloadDescriptor, Target, TransferResult};
use tokio_util::sync::CancellationToken;

use crate::client::NetClient;

/// Download `descriptor.location` into `target` and verify its digest
///
/// # Errors
///
/// - [`NetworkError::DownloadRequestFailed`] on transport failure or
///   cancellation before the response arrives
/// - [`NetworkError::DownloadHttpError`] for status codes of 400 and above
/// - any [`TransferError`](addonhub_errors::TransferError) from creating,
///   writing, closing or verifying the destination
pub async fn transfer(
    client: &NetClient,
    descriptor: &DownloadDescriptor,
    target: &Target,
    cancel: &CancellationToken,
    tx: &EventSender,
) -> Result<TransferResult, Error> {
    let url = descriptor.location.as_str();
    tracing::debug!(url, %target, "starting transfer");

    let response = client
        .send(client.inner().get(descriptor.location.clone()), cancel)
        .await
        .map_err(|e| NetworkError::DownloadRequestFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;
    validation::validate_response(&response)?;

    tx.emit_download_started(url, response.content_length());

    let result = match target {
        Target::Stdout => {
            let body = Box::pin(response.bytes_stream());
            stream_verified(body, WriterSink::stdout(), &descriptor.checksum, cancel).await?
        }
        Target::Directory(dir) => {
            let path = validation::destination(dir, response.url())?;
            let sink = FileSink::create(&path).await?;
            let body = Box::pin(response.bytes_stream());

            match stream_verified(body, sink, &descriptor.checksum, cancel).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "transfer rolled back");
                    tx.emit(AppEvent::Download(DownloadEvent::RolledBack {
                        path,
                        reason: e.to_string(),
                    }));
                    return Err(e);
                }
            }
        }
    };

    tx.emit_download_completed(
        url,
        result.bytes_written,
        result.digest.clone(),
        result.path.clone(),
    );
    Ok(result)
}
