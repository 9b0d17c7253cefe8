//! `switch`: select the team session-token calls are scoped to

use addonhub_config::constants::CURRENT_TEAM_KEY;
use addonhub_errors::{AuthError, Error};
use addonhub_events::{AppEvent, EventEmitter, TeamEvent};

use crate::context::OpsCtx;
use crate::types::TeamSwitchReport;

/// Persist `team` as the current team after checking the credential can see it
///
/// # Errors
///
/// Returns [`AuthError::UnknownTeam`] if `team` is not among the credential's
/// teams, or any credential, listing or settings write error.
pub async fn switch_team(ctx: &OpsCtx, team: &str) -> Result<TeamSwitchReport, Error> {
    let hub = ctx.hub_client()?;
    let teams = hub.list_teams(&ctx.cancel).await?;

    if !teams.iter().any(|t| t == team) {
        return Err(AuthError::UnknownTeam {
            team: team.to_string(),
            available: teams,
        }
        .into());
    }

    let previous = ctx
        .settings
        .get(CURRENT_TEAM_KEY)?
        .filter(|value| !value.is_empty());
    ctx.settings.set(CURRENT_TEAM_KEY, team)?;

    tracing::info!(team, previous = ?previous, "current team switched");
    ctx.emit(AppEvent::Team(TeamEvent::Switched {
        team: team.to_string(),
    }));

    Ok(TeamSwitchReport {
        team: team.to_string(),
        previous,
    })
}
