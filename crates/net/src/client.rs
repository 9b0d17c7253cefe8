//! HTTP client with connection pooling and cooperative cancellation

use addonhub_config::NetworkConfig;
use addonhub_errors::{Error, NetworkError};
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response};
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// Whole-request limit for registry API calls, applied per request
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Longest silence tolerated between reads on any response
    pub read_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(120),
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: format!("addonhub/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&NetworkConfig> for NetConfig {
    fn from(config: &NetworkConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout),
            connect_timeout: Duration::from_secs(config.connect_timeout),
            read_timeout: Duration::from_secs(config.read_timeout),
            ..Self::default()
        }
    }
}

/// Why a request produced no response
///
/// Cancellation is reported through the same channel as transport failures;
/// callers fold both into their own "request failed" error.
#[derive(Debug)]
pub enum SendError {
    Cancelled,
    Transport(reqwest::Error),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::Transport(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SendError {}

/// HTTP client wrapper
///
/// Requests are issued once: there is no retry policy. The client itself
/// carries only connect and read-idle timeouts so that streamed downloads
/// can run as long as data keeps arriving; see [`NetClient::api_get`].
#[derive(Clone)]
pub struct NetClient {
    client: Client,
    config: NetConfig,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ClientInit(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(NetConfig::default())
    }

    /// Start a GET for a small API response, bounded by [`NetConfig::timeout`]
    #[must_use]
    pub fn api_get(&self, url: Url) -> RequestBuilder {
        self.client.get(url).timeout(self.config.timeout)
    }

    /// Send a prepared request, aborting if `cancel` fires first
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Cancelled`] if the token fires before a response
    /// arrives, or [`SendError::Transport`] for connection-level failures.
    pub async fn send(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Response, SendError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(SendError::Cancelled),
            result = request.send() => result.map_err(SendError::Transport),
        }
    }

    /// Read a whole (small) response body under the cancellation token
    ///
    /// # Errors
    ///
    /// See [`NetClient::send`].
    pub async fn read_body(
        &self,
        response: Response,
        cancel: &CancellationToken,
    ) -> Result<Bytes, SendError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(SendError::Cancelled),
            result = response.bytes() => result.map_err(SendError::Transport),
        }
    }

    /// Get the underlying reqwest client for building requests
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}
