//! Single-pass hash-and-write loop

use addonhub_errors::{Error, TransferError};
use addonhub_hash::Hasher;
use addonhub_types::TransferResult;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use tokio_util::sync::CancellationToken;

use super::sink::Sink;

/// Copy `body` into `sink` while hashing it, then verify and commit
///
/// Each chunk is hashed and written before the next one is read. Both the
/// read and the write are abandoned as soon as `cancel` fires. The body is
/// dropped before the sink is closed. The sink is committed only if the
/// digest equals `expected` exactly; on every other path it is dropped
/// uncommitted.
///
/// # Errors
///
/// - [`TransferError::TransferWriteFailed`] if reading the body or writing the
///   sink fails, or `cancel` fires mid-copy
/// - [`TransferError::TransferCloseFailed`] if the sink cannot be closed
/// - [`TransferError::ChecksumMismatch`] if the digest differs from `expected`
pub async fn stream_verified<B, E, S>(
    mut body: B,
    mut sink: S,
    expected: &str,
    cancel: &CancellationToken,
) -> Result<TransferResult, Error>
where
    B: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
    S: Sink,
{
    let mut hasher = Hasher::new();

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled()),
            next = body.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                hasher.update(&chunk);
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(cancelled()),
                    written = sink.write_chunk(&chunk) => written?,
                }
            }
            Some(Err(e)) => {
                return Err(TransferError::TransferWriteFailed {
                    message: e.to_string(),
                }
                .into());
            }
            None => break,
        }
    }

    drop(body);
    sink.close().await?;

    let bytes_written = hasher.bytes_hashed();
    let digest = hasher.finalize();
    if !digest.matches_hex(expected) {
        return Err(TransferError::ChecksumMismatch {
            expected: expected.to_string(),
            actual: digest.to_hex(),
        }
        .into());
    }

    tracing::debug!(%digest, bytes = bytes_written, "transfer verified");
    Ok(TransferResult {
        bytes_written,
        digest: digest.to_hex(),
        path: sink.commit(),
    })
}

fn cancelled() -> Error {
    TransferError::TransferWriteFailed {
        message: "operation cancelled".to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::sink::{FileSink, WriterSink};
    use addonhub_hash::Hash;
    use futures::stream;
    use std::time::Duration;

    fn chunks(parts: &[&str]) -> impl Stream<Item = Result<Bytes, String>> + Unpin {
        stream::iter(
            parts
                .iter()
                .map(|part| Ok(Bytes::from(part.as_bytes().to_vec())))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_verified_file_is_committed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.zip");
        let expected = Hash::from_data(b"hello world").to_hex();

        let sink = FileSink::create(&path).await.unwrap();
        let result = stream_verified(
            chunks(&["hello ", "world"]),
            sink,
            &expected,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(result.bytes_written, 11);
        assert_eq!(result.digest, expected);
        assert_eq!(result.path.as_deref(), Some(path.as_path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn test_mismatch_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.zip");

        let sink = FileSink::create(&path).await.unwrap();
        let err = stream_verified(
            chunks(&["hello world"]),
            sink,
            &Hash::from_data(b"something else").to_hex(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        match err {
            Error::Transfer(TransferError::ChecksumMismatch { actual, .. }) => {
                assert_eq!(actual, Hash::from_data(b"hello world").to_hex());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_uppercase_checksum_is_a_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.zip");
        let upper = Hash::from_data(b"hello world").to_hex().to_uppercase();

        let sink = FileSink::create(&path).await.unwrap();
        let err = stream_verified(chunks(&["hello world"]), sink, &upper, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Transfer(TransferError::ChecksumMismatch { .. })
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_body_error_mid_stream_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.zip");
        let body = stream::iter(vec![
            Ok(Bytes::from_static(b"first chunk")),
            Err("connection reset".to_string()),
            Ok(Bytes::from_static(b"never read")),
        ]);

        let sink = FileSink::create(&path).await.unwrap();
        let err = stream_verified(body, sink, "irrelevant", &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            Error::Transfer(TransferError::TransferWriteFailed { message }) => {
                assert_eq!(message, "connection reset");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_cancelled_copy_is_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.zip");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let sink = FileSink::create(&path).await.unwrap();
        let err = stream_verified(chunks(&["data"]), sink, "irrelevant", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Transfer(TransferError::TransferWriteFailed { .. })
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_cancel_while_body_stalls_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.zip");
        let cancel = CancellationToken::new();
        let body = stream::iter(vec![Ok::<_, String>(Bytes::from_static(b"first chunk"))])
            .chain(stream::pending());

        let canceller = cancel.clone();
        let partial = path.clone();
        let watcher = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let existed = partial.exists();
            canceller.cancel();
            existed
        });

        let sink = FileSink::create(&path).await.unwrap();
        let err = tokio::time::timeout(
            Duration::from_secs(5),
            stream_verified(body, sink, "irrelevant", &cancel),
        )
        .await
        .expect("cancellation should end the copy")
        .unwrap_err();

        assert!(watcher.await.unwrap(), "partial file should exist mid-copy");

        match err {
            Error::Transfer(TransferError::TransferWriteFailed { message }) => {
                assert_eq!(message, "operation cancelled");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_cancel_while_sink_stalls() {
        // Nobody reads the other end, so the write blocks once the pipe is full
        let (writer, _reader) = tokio::io::duplex(8);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let payload = "x".repeat(4096);
        let body = chunks(&[payload.as_str()]);
        let err = tokio::time::timeout(
            Duration::from_secs(5),
            stream_verified(body, WriterSink::new(writer), "irrelevant", &cancel),
        )
        .await
        .expect("cancellation should end a blocked write")
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Transfer(TransferError::TransferWriteFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_body_verifies_against_empty_digest() {
        let expected = Hash::from_data(b"").to_hex();
        let result = stream_verified(
            chunks(&[]),
            WriterSink::new(Vec::new()),
            &expected,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(result.bytes_written, 0);
        assert!(result.path.is_none());
    }
}
