use crate::{data::Context, giveaway, platform::SHORT_NOTICE, utils};

super::command! {
    /// Drop the current giveaway, its configuration and its schedule
    pub async fn cancel_giveaway(ctx: Context<'_>) -> Result<()> {
        let Some(mut state) = super::operator_state(ctx).await? else {
            return Ok(());
        };

        giveaway::cancel_giveaway(&mut state, &ctx.data().platform, ctx.author().id).await;
        drop(state);

        utils::transient_text(ctx, "✅ Done.", SHORT_NOTICE).await
    }
}
