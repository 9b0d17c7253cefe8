//! Termination signal → cancellation token bridge

use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns the shared cancellation token and the task that fires it
///
/// The listener cancels the token at most once and never exits the process;
/// in-flight operations observe the token and unwind through their own error
/// paths. Dropping the supervisor stops listening.
#[derive(Debug)]
pub struct Supervisor {
    cancel: CancellationToken,
    listener: JoinHandle<()>,
}

impl Supervisor {
    /// Listen for SIGTERM (Ctrl-C where SIGTERM does not exist)
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn install() -> Self {
        Self::with_signal(async {
            if let Err(e) = termination_signal().await {
                tracing::warn!(error = %e, "could not listen for termination signal");
                std::future::pending::<()>().await;
            }
        })
    }

    /// Cancel the token when `signal` completes
    #[must_use]
    pub fn with_signal<F>(signal: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let listener = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = signal => {
                    tracing::warn!("termination requested, cancelling in-flight operations");
                    token.cancel();
                }
            }
        });
        Self { cancel, listener }
    }

    /// Token to hand to operations
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Resolve once the process is asked to terminate
///
/// # Errors
///
/// Returns an error if the signal handler cannot be registered.
#[cfg(unix)]
pub async fn termination_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    terminate.recv().await;
    Ok(())
}

/// Resolve once the process is asked to terminate
///
/// # Errors
///
/// Returns an error if the signal handler cannot be registered.
#[cfg(not(unix))]
pub async fn termination_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
