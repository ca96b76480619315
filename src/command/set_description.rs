use crate::{data::Context, platform::SHORT_NOTICE, utils};

super::command! {
    /// Set the description of the next giveaway
    pub async fn set_description(
        ctx: Context<'_>,
        #[description = "The announcement text"]
        #[rest]
        description: String
    ) -> Result<()> {
        let Some(mut state) = super::operator_state(ctx).await? else {
            return Ok(());
        };
        state.set_description(description);
        drop(state);
        trace!("giveaway description updated");

        utils::transient_text(ctx, "✅ Done.", SHORT_NOTICE).await
    }
}
