//! Destinations a verified transfer writes into

use addonhub_errors::TransferError;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// A byte destination with an explicit commit step
///
/// Nothing written to a sink is final until [`Sink::commit`] is called.
/// Sinks that can be undone undo themselves when dropped uncommitted.
#[allow(async_fn_in_trait)]
pub trait Sink {
    /// Write one chunk in full
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::TransferWriteFailed`] if the destination
    /// rejects the bytes.
    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), TransferError>;

    /// Flush and release the underlying handle
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::TransferCloseFailed`] if buffered data could
    /// not be persisted.
    async fn close(&mut self) -> Result<(), TransferError>;

    /// Make the written bytes permanent and return where they landed
    fn commit(self) -> Option<PathBuf>;

    /// Where this sink writes, if it is a file
    fn location(&self) -> Option<&Path>;
}

/// Exclusively created file, removed on drop unless committed
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl FileSink {
    /// Create `path`, refusing to touch anything already there
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::DestinationExists`] if any filesystem entry is
    /// present at `path`, and [`TransferError::CreateFailed`] if the file
    /// cannot be created.
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self, TransferError> {
        let path = path.into();

        if let Ok(metadata) = tokio::fs::symlink_metadata(&path).await {
            return Err(TransferError::DestinationExists {
                path,
                is_dir: metadata.is_dir(),
            });
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    TransferError::DestinationExists {
                        path: path.clone(),
                        is_dir: path.is_dir(),
                    }
                } else {
                    TransferError::CreateFailed {
                        path: path.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        tracing::debug!(path = %path.display(), "created destination file");
        Ok(Self {
            path,
            file: Some(file),
            committed: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), TransferError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| TransferError::TransferWriteFailed {
                message: format!("{} is already closed", self.path.display()),
            })?;
        file.write_all(chunk)
            .await
            .map_err(|e| TransferError::TransferWriteFailed {
                message: e.to_string(),
            })
    }

    async fn close(&mut self) -> Result<(), TransferError> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        let close_failed = |e: std::io::Error| TransferError::TransferCloseFailed {
            message: e.to_string(),
        };
        file.flush().await.map_err(close_failed)?;
        file.sync_all().await.map_err(close_failed)?;
        Ok(())
    }

    fn commit(mut self) -> Option<PathBuf> {
        self.committed = true;
        Some(self.path.clone())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // Release the handle before unlinking
        self.file.take();
        // Drop cannot await. One unlink of a file this process just created
        // is short enough to run on the worker thread.
        if std::fs::remove_file(&self.path).is_ok() {
            tracing::debug!(path = %self.path.display(), "removed uncommitted file");
        }
    }
}

/// Pass-through sink over any async writer; nothing to roll back
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<tokio::io::Stdout> {
    /// Sink writing to the process's standard output
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin> Sink for WriterSink<W> {
    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), TransferError> {
        self.writer
            .write_all(chunk)
            .await
            .map_err(|e| TransferError::TransferWriteFailed {
                message: e.to_string(),
            })
    }

    async fn close(&mut self) -> Result<(), TransferError> {
        self.writer
            .flush()
            .await
            .map_err(|e| TransferError::TransferCloseFailed {
                message: e.to_string(),
            })
    }

    fn commit(self) -> Option<PathBuf> {
        None
    }

    fn location(&self) -> Option<&Path> {
        None
    }
}
