//! Registry API client
//!
//! Two endpoints are consumed, both bearer-authenticated:
//!
//! - `GET /teams?page=N&per_page=M` lists the teams the credential belongs to
//! - `GET /teams/{team}/addons/{addon_team}/{type}/{name}/versions/{version}/download`
//!   returns the asset location and checksum when asked for JSON

use addonhub_errors::{Error, NetworkError};
use addonhub_types::{AddonReference, Credential, DownloadDescriptor, TeamScope};
use reqwest::header::ACCEPT;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::client::NetClient;

/// Page size requested when listing teams
pub const TEAMS_PER_PAGE: usize = 100;

const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Deserialize)]
struct TeamList {
    #[serde(default)]
    items: Vec<TeamItem>,
    #[serde(default)]
    metadata: ListMetadata,
}

#[derive(Debug, Deserialize)]
struct TeamItem {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ListMetadata {
    last_page: Option<u32>,
}

/// Error body the registry sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Authenticated client for the addon registry
#[derive(Clone)]
pub struct HubClient {
    net: NetClient,
    base_url: Url,
    credential: Credential,
}

impl HubClient {
    /// Create a client for the registry at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(net: NetClient, base_url: &str, credential: Credential) -> Result<Self, Error> {
        let base_url = crate::parse_url(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl(base_url.to_string()).into());
        }
        Ok(Self {
            net,
            base_url,
            credential,
        })
    }

    #[must_use]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    #[must_use]
    pub fn net(&self) -> &NetClient {
        &self.net
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// List every team the credential is a member of, following pagination
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::TeamListFailed`] on transport failure or
    /// cancellation, and [`NetworkError::TeamListHttpError`] for error statuses
    /// or undecodable bodies.
    pub async fn list_teams(&self, cancel: &CancellationToken) -> Result<Vec<String>, Error> {
        let mut teams = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut url = self.endpoint(&["teams"]);
            url.query_pairs_mut()
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &TEAMS_PER_PAGE.to_string());

            let request = self
                .net
                .api_get(url)
                .bearer_auth(self.credential.expose())
                .header(ACCEPT, APPLICATION_JSON);

            let failed = |e: crate::SendError| NetworkError::TeamListFailed {
                message: e.to_string(),
            };
            let response = self.net.send(request, cancel).await.map_err(failed)?;
            let status = response.status();
            if !status.is_success() {
                let message = self.error_message(response, cancel).await;
                return Err(NetworkError::TeamListHttpError {
                    status: status.as_u16(),
                    message,
                }
                .into());
            }

            let body = self.net.read_body(response, cancel).await.map_err(failed)?;
            let list: TeamList =
                serde_json::from_slice(&body).map_err(|e| NetworkError::TeamListHttpError {
                    status: status.as_u16(),
                    message: format!("invalid response body: {e}"),
                })?;

            let received = list.items.len();
            teams.extend(list.items.into_iter().map(|team| team.name));

            let done = match list.metadata.last_page {
                Some(last) => page >= last,
                None => received < TEAMS_PER_PAGE,
            };
            if done || received == 0 {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = teams.len(), "listed teams");
        Ok(teams)
    }

    /// Look up where an addon version can be downloaded and what it hashes to
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::MetadataRequestFailed`] on transport failure or
    /// cancellation, and [`NetworkError::MetadataHttpError`] when the status is
    /// anything but 200 or the body is absent or unparseable.
    pub async fn addon_metadata(
        &self,
        scope: &TeamScope,
        reference: &AddonReference,
        cancel: &CancellationToken,
    ) -> Result<DownloadDescriptor, Error> {
        let url = self.endpoint(&[
            "teams",
            scope.as_str(),
            "addons",
            &reference.team,
            reference.kind.as_str(),
            &reference.name,
            "versions",
            &reference.version,
            "download",
        ]);
        tracing::debug!(%url, team = %scope, "requesting addon metadata");

        let request = self
            .net
            .api_get(url)
            .bearer_auth(self.credential.expose())
            .header(ACCEPT, APPLICATION_JSON);

        let failed = |e: crate::SendError| NetworkError::MetadataRequestFailed {
            message: e.to_string(),
        };
        let response = self.net.send(request, cancel).await.map_err(failed)?;
        let status = response.status();
        if status != StatusCode::OK {
            let message = self.error_message(response, cancel).await;
            return Err(NetworkError::MetadataHttpError {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = self.net.read_body(response, cancel).await.map_err(failed)?;
        if body.is_empty() {
            return Err(NetworkError::MetadataHttpError {
                status: status.as_u16(),
                message: "empty response body".to_string(),
            }
            .into());
        }

        serde_json::from_slice::<DownloadDescriptor>(&body).map_err(|e| {
            NetworkError::MetadataHttpError {
                status: status.as_u16(),
                message: format!("invalid response body: {e}"),
            }
            .into()
        })
    }

    /// Best-effort decoding of an error response into a message
    async fn error_message(&self, response: Response, cancel: &CancellationToken) -> String {
        let status = response.status();
        match self.net.read_body(response, cancel).await {
            Ok(body) => decode_error_body(status, &body),
            Err(_) => status_text(status),
        }
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_string(), ToString::to_string)
}

/// Prefer the registry's `{"message": ...}` body, fall back to the status text
pub(crate) fn decode_error_body(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(error) if !error.message.is_empty() => error.message,
        _ => status_text(status),
    }
}
