use crate::{
    data::Context,
    platform::{FORMAT_NOTICE, SHORT_NOTICE},
    utils,
};

super::command! {
    /// Set the emoji members react with to enter
    pub async fn set_emoji(
        ctx: Context<'_>,
        #[description = "A unicode emoji or a custom emoji of this server"]
        emoji: String
    ) -> Result<()> {
        let Some(mut state) = super::operator_state(ctx).await? else {
            return Ok(());
        };

        if !state.set_emoji(&emoji) {
            drop(state);
            debug!(%emoji, "rejected entry emoji");

            return utils::transient_text(
                ctx,
                format!("❌ {} can't be used as a reaction.", emoji),
                FORMAT_NOTICE,
            )
            .await;
        }
        drop(state);
        trace!(%emoji, "giveaway entry emoji updated");

        utils::transient_text(ctx, "✅ Done.", SHORT_NOTICE).await
    }
}
