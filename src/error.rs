use color_eyre::eyre::Result;
use poise::BoxFuture;

use crate::{
    data::FrameworkError,
    platform::FORMAT_NOTICE,
    utils,
};

/// A custom error handler to improve upon some of the builtin error handling
/// behavior. Falls back to the builtins for most cases.
///
/// Nothing reported to users here stays around: slash commands get ephemeral
/// replies and text command replies delete themselves.
async fn handle_error_inner(err: FrameworkError<'_>) -> Result<()> {
    match err {
        FrameworkError::Setup { error, .. } => {
            error!("setup error: {:?}", error);
        }
        FrameworkError::Command { error, ctx, .. } => {
            error!("command error: {:?}", error);
            utils::transient_text(ctx, format!("❌ Error: {:#}", error), FORMAT_NOTICE).await?;
        }
        FrameworkError::ArgumentParse { error, input, ctx, .. } => {
            debug!(?input, "invalid command arguments: {}", error);
            utils::transient_text(ctx, format!("❌ {}", error), FORMAT_NOTICE).await?;
        }
        FrameworkError::MissingBotPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            error!("missing bot permissions: {}", missing_permissions);
            utils::transient_text(
                ctx,
                format!("Missing bot permissions: {}", missing_permissions),
                FORMAT_NOTICE,
            )
            .await?;
        }
        _ => {
            poise::builtins::on_error(err).await?;
        }
    }

    Ok(())
}

pub fn handle_error(err: FrameworkError<'_>) -> BoxFuture<()> {
    Box::pin(async move {
        if let Err(err) = handle_error_inner(err).await {
            error!("error handling error: {:?}", err);
        }
    })
}
