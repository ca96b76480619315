use rand::{rngs::StdRng, SeedableRng};

use crate::{
    data::Context,
    giveaway::{self, DrawOutcome},
    platform::SHORT_NOTICE,
    utils,
};

super::command! {
    /// Draw a winner for the running giveaway now, whatever the schedule says
    pub async fn draw_winner(ctx: Context<'_>) -> Result<()> {
        let Some(mut state) = super::operator_state(ctx).await? else {
            return Ok(());
        };

        let mut rng = StdRng::from_entropy();
        let outcome = giveaway::draw_winner(&mut state, &ctx.data().platform, &mut rng).await;
        drop(state);
        let outcome = outcome?;
        debug!(?outcome, "manual draw");

        let content = match outcome {
            DrawOutcome::NotOpen => "❌ No giveaway is running.",
            DrawOutcome::NoReactions => "❌ No reactions found.",
            DrawOutcome::NoEligibleUsers => "❌ No eligible users.",
            DrawOutcome::Winner(_) => "✅ Done.",
        };

        utils::transient_text(ctx, content, SHORT_NOTICE).await
    }
}
