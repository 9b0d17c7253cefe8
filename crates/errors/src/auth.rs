//! Credential and team scope errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("failed to get auth token: {message}")]
    TokenUnavailable { message: String },

    #[error("unknown token type {kind:?}")]
    UnsupportedCredentialType { kind: String },

    #[error("team is required")]
    TeamNotConfigured,

    #[error("api key has no assigned team")]
    NoTeamAssigned,

    #[error("api key has more than one team: {}", teams.join(", "))]
    AmbiguousTeam { teams: Vec<String> },

    #[error("team {team:?} not found, available teams: {}", available.join(", "))]
    UnknownTeam {
        team: String,
        available: Vec<String>,
    },
}

impl UserFacingError for AuthError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::TokenUnavailable { .. } => {
                Some("Log in to the registry or export ADDONHUB_API_KEY.")
            }
            Self::UnsupportedCredentialType { .. } => {
                Some("Set `type` in credentials.toml to \"session\" or \"api_key\".")
            }
            Self::TeamNotConfigured => Some("Use `addonhub switch <team>` to set a team."),
            Self::NoTeamAssigned | Self::AmbiguousTeam { .. } => {
                Some("Use an API key that is scoped to exactly one team.")
            }
            Self::UnknownTeam { .. } => Some("Pick one of the teams listed above."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::TokenUnavailable { .. } => "auth.token_unavailable",
            Self::UnsupportedCredentialType { .. } => "auth.unsupported_credential_type",
            Self::TeamNotConfigured => "auth.team_not_configured",
            Self::NoTeamAssigned => "auth.no_team_assigned",
            Self::AmbiguousTeam { .. } => "auth.ambiguous_team",
            Self::UnknownTeam { .. } => "auth.unknown_team",
        };
        Some(code)
    }
}
