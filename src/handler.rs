use color_eyre::eyre::Result;
use poise::BoxFuture;
use serenity::all::{Context, FullEvent, GuildMemberUpdateEvent, Member};

use crate::{
    data::{Data, FrameworkContext},
    giveaway::{self, RevocationOutcome},
};

pub fn event_handler<'a>(
    _ctx: &'a Context,
    event: &'a FullEvent,
    _framework: FrameworkContext<'a>,
    data: &'a Data,
) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        if let FullEvent::GuildMemberUpdate {
            old_if_available,
            event,
            ..
        } = event
        {
            member_update(data, old_if_available.as_ref(), event).await;
        }

        Ok(())
    })
}

/// Revoke the giveaway entry of a member who just lost an eligible role, or
/// who holds none anymore when their previous roles weren't cached
async fn member_update(data: &Data, old: Option<&Member>, event: &GuildMemberUpdateEvent) {
    if event.user.bot {
        return;
    }

    if old.is_none() {
        trace!(user = %event.user.id, "member update without cached roles");
    }

    let state = data.giveaway.lock().await;

    match giveaway::revoke_entry(
        &state,
        &data.platform,
        event.user.id,
        old.map(|member| member.roles.as_slice()),
        &event.roles,
    )
    .await
    {
        Ok(RevocationOutcome::Revoked) => {}
        Ok(outcome) => trace!(user = %event.user.id, ?outcome, "member update"),
        Err(err) => warn!("failed to revoke giveaway entry of {}: {}", event.user.id, err),
    }
}
