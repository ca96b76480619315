use crate::{
    data::Context,
    giveaway::{self, GiveawayError, OpenTrigger},
    platform::{FORMAT_NOTICE, SHORT_NOTICE},
    utils,
};

super::command! {
    /// Post the giveaway announcement and start accepting entries
    pub async fn start_giveaway(ctx: Context<'_>) -> Result<()> {
        let Some(mut state) = super::operator_state(ctx).await? else {
            return Ok(());
        };

        let trigger = OpenTrigger::Manual(ctx.author().id);
        let opened = giveaway::open_giveaway(&mut state, &ctx.data().platform, trigger).await;
        drop(state);

        match opened {
            Ok(_) => utils::transient_text(ctx, "✅ Done.", SHORT_NOTICE).await,
            Err(GiveawayError::AlreadyOpen(_)) => {
                utils::transient_text(
                    ctx,
                    "❌ A giveaway is already running. Draw a winner or cancel it first.",
                    SHORT_NOTICE,
                )
                .await
            }
            Err(GiveawayError::EntryReaction { emoji, source }) => {
                debug!("entry reaction failed: {}", source);

                utils::transient_text(
                    ctx,
                    format!("❌ Could not react with {}. Pick another emoji with set_emoji.", emoji),
                    FORMAT_NOTICE,
                )
                .await
            }
            Err(err) => Err(err.into()),
        }
    }
}
