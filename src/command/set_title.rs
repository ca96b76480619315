use crate::{data::Context, platform::SHORT_NOTICE, utils};

super::command! {
    /// Set the title of the next giveaway
    pub async fn set_title(
        ctx: Context<'_>,
        #[description = "The announcement title"]
        #[rest]
        title: String
    ) -> Result<()> {
        let Some(mut state) = super::operator_state(ctx).await? else {
            return Ok(());
        };
        state.set_title(title);
        drop(state);
        trace!("giveaway title updated");

        utils::transient_text(ctx, "✅ Done.", SHORT_NOTICE).await
    }
}
