use std::time::Duration;

use color_eyre::eyre::Result;
use poise::CreateReply;
use serenity::all::{Mentionable, UserId};

use crate::data::Context;

pub fn mention(user_id: UserId) -> String {
    user_id.mention().to_string()
}

/// Reply with something that won't clutter the channel. Slash commands get an
/// ephemeral reply, text commands get a reply that is deleted after
/// `lifetime`.
pub async fn transient_reply(ctx: Context<'_>, reply: CreateReply, lifetime: Duration) -> Result<()> {
    let handle = ctx.send(reply.ephemeral(true)).await?;

    if let poise::Context::Prefix(_) = ctx {
        let message = handle.into_message().await?;
        let http = ctx.serenity_context().http.clone();

        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;

            if let Err(err) = message.delete(&*http).await {
                debug!("failed to remove transient reply: {:?}", err);
            }
        });
    }

    Ok(())
}

pub async fn transient_text(
    ctx: Context<'_>,
    content: impl Into<String>,
    lifetime: Duration,
) -> Result<()> {
    transient_reply(ctx, CreateReply::default().content(content), lifetime).await
}
