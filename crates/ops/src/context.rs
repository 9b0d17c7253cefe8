//! Operations context for dependency injection

use addonhub_config::{Config, SettingsStore, TokenProvider};
use addonhub_errors::Error;
use addonhub_events::{EventEmitter, EventSender};
use addonhub_net::{HubClient, NetClient};
use tokio_util::sync::CancellationToken;

/// Everything an operation needs for one invocation
///
/// The cancellation token is shared by every request and copy loop the
/// operation runs; firing it aborts whatever is in flight.
pub struct OpsCtx {
    /// Network client
    pub net: NetClient,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// System configuration
    pub config: Config,
    /// Cancels in-flight network calls and transfers
    pub cancel: CancellationToken,
    /// Locally persisted settings (current team)
    pub settings: Box<dyn SettingsStore>,
    /// Source of the bearer credential
    pub tokens: Box<dyn TokenProvider>,
}

impl OpsCtx {
    // No public constructor - use OpsContextBuilder instead

    /// Acquire the credential and bind it to a registry client
    ///
    /// # Errors
    ///
    /// Returns an error if no credential is available or the configured API
    /// URL is invalid.
    pub fn hub_client(&self) -> Result<HubClient, Error> {
        let credential = self.tokens.credential()?;
        tracing::debug!(kind = %credential.kind(), "credential acquired");
        HubClient::new(self.net.clone(), &self.config.api.url, credential)
    }
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for operations context
pub struct OpsContextBuilder {
    net: Option<NetClient>,
    tx: Option<EventSender>,
    config: Option<Config>,
    cancel: Option<CancellationToken>,
    settings: Option<Box<dyn SettingsStore>>,
    tokens: Option<Box<dyn TokenProvider>>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            net: None,
            tx: None,
            config: None,
            cancel: None,
            settings: None,
            tokens: None,
        }
    }

    /// Set network client
    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = Some(net);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the cancellation token; a fresh one is used otherwise
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Set settings store
    #[must_use]
    pub fn with_settings(mut self, settings: impl SettingsStore + 'static) -> Self {
        self.settings = Some(Box::new(settings));
        self
    }

    /// Set credential source
    #[must_use]
    pub fn with_token_provider(mut self, tokens: impl TokenProvider + 'static) -> Self {
        self.tokens = Some(Box::new(tokens));
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let net = self
            .net
            .ok_or_else(|| Error::internal("network client is required"))?;
        let tx = self
            .tx
            .ok_or_else(|| Error::internal("event sender is required"))?;
        let config = self
            .config
            .ok_or_else(|| Error::internal("config is required"))?;
        let settings = self
            .settings
            .ok_or_else(|| Error::internal("settings store is required"))?;
        let tokens = self
            .tokens
            .ok_or_else(|| Error::internal("token provider is required"))?;

        Ok(OpsCtx {
            net,
            tx,
            config,
            cancel: self.cancel.unwrap_or_else(CancellationToken::new),
            settings,
            tokens,
        })
    }
}

impl Default for OpsContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
