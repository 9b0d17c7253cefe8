//! `addon download`: reference → team → metadata → verified transfer

use addonhub_errors::Error;
use addonhub_events::{
    AppEvent, DownloadEvent, EventEmitter, FailureContext, GeneralEvent, TeamEvent,
};
use addonhub_types::{AddonReference, CredentialType, Target};

use crate::context::OpsCtx;
use crate::team::resolve_team;
use crate::types::AddonDownloadReport;

const OPERATION: &str = "addon download";

/// Download one addon version into `target`, verifying its SHA-256
///
/// Steps run strictly in order and any failure ends the operation: parse
/// the reference, acquire the credential, resolve the team scope, fetch the
/// download metadata, then stream and verify the asset. A file destination
/// that fails verification is removed before this returns.
///
/// # Errors
///
/// Returns the first error any step produces. Cancellation surfaces as the
/// failing step's request or write error.
pub async fn download_addon(
    ctx: &OpsCtx,
    reference: &str,
    target: &Target,
) -> Result<AddonDownloadReport, Error> {
    let reference: AddonReference = reference.parse()?;
    ctx.emit(AppEvent::General(GeneralEvent::OperationStarted {
        operation: OPERATION.to_string(),
    }));

    let result = run(ctx, &reference, target).await;

    ctx.emit(AppEvent::General(GeneralEvent::OperationCompleted {
        operation: OPERATION.to_string(),
        success: result.is_ok(),
    }));
    result
}

async fn run(
    ctx: &OpsCtx,
    reference: &AddonReference,
    target: &Target,
) -> Result<AddonDownloadReport, Error> {
    let hub = ctx.hub_client()?;

    let scope = resolve_team(hub.credential(), ctx.settings.as_ref(), &hub, &ctx.cancel).await?;
    let source = match hub.credential().kind() {
        CredentialType::SessionToken => "settings",
        CredentialType::ApiKey => "api_key",
    };
    tracing::debug!(team = %scope, source, "team resolved");
    ctx.emit(AppEvent::Team(TeamEvent::Resolved {
        team: scope.to_string(),
        source: source.to_string(),
    }));

    let descriptor = hub.addon_metadata(&scope, reference, &ctx.cancel).await?;
    ctx.emit(AppEvent::Download(DownloadEvent::MetadataResolved {
        reference: reference.to_string(),
        location: descriptor.location.to_string(),
        checksum: descriptor.checksum.clone(),
    }));

    let result = match addonhub_net::transfer(&ctx.net, &descriptor, target, &ctx.cancel, &ctx.tx)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            ctx.emit(AppEvent::Download(DownloadEvent::Failed {
                url: descriptor.location.to_string(),
                failure: FailureContext::from_error(&e),
            }));
            return Err(e);
        }
    };

    Ok(AddonDownloadReport {
        reference: reference.to_string(),
        team: scope.to_string(),
        location: descriptor.location.to_string(),
        bytes_written: result.bytes_written,
        digest: result.digest,
        path: result.path,
    })
}
