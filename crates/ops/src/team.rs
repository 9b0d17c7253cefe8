//! Team scope resolution

use addonhub_config::constants::CURRENT_TEAM_KEY;
use addonhub_config::SettingsStore;
use addonhub_errors::{AuthError, Error};
use addonhub_net::HubClient;
use addonhub_types::{Credential, CredentialType, TeamScope};
use tokio_util::sync::CancellationToken;

/// Anything that can list the teams a credential belongs to
#[allow(async_fn_in_trait)]
pub trait TeamDirectory {
    /// # Errors
    ///
    /// Returns an error if the listing cannot be obtained.
    async fn list_teams(&self, cancel: &CancellationToken) -> Result<Vec<String>, Error>;
}

impl TeamDirectory for HubClient {
    async fn list_teams(&self, cancel: &CancellationToken) -> Result<Vec<String>, Error> {
        HubClient::list_teams(self, cancel).await
    }
}

/// Decide which team registry calls are scoped to
///
/// Session tokens use the locally selected team. API keys must belong to
/// exactly one team.
///
/// # Errors
///
/// - [`AuthError::TeamNotConfigured`] for a session token with no team set
/// - [`AuthError::NoTeamAssigned`] / [`AuthError::AmbiguousTeam`] for API keys
///   with zero or several teams
/// - settings read and team listing errors are passed through
pub async fn resolve_team<D: TeamDirectory>(
    credential: &Credential,
    settings: &dyn SettingsStore,
    directory: &D,
    cancel: &CancellationToken,
) -> Result<TeamScope, Error> {
    match credential.kind() {
        CredentialType::SessionToken => {
            // An unset key and an empty value are the same failure
            match settings.get(CURRENT_TEAM_KEY)? {
                Some(team) if !team.is_empty() => Ok(TeamScope::new(team)),
                _ => Err(AuthError::TeamNotConfigured.into()),
            }
        }
        CredentialType::ApiKey => {
            let mut teams = directory.list_teams(cancel).await?;
            match teams.len() {
                0 => Err(AuthError::NoTeamAssigned.into()),
                1 => Ok(TeamScope::new(teams.remove(0))),
                _ => Err(AuthError::AmbiguousTeam { teams }.into()),
            }
        }
    }
}
