use crate::data::{state::GiveawayState, Context};

use super::set_start::set_schedule_time;

super::command! {
    /// Draw the winner automatically at this UTC time (YYYY-MM-DD HH:MM)
    pub async fn set_end(
        ctx: Context<'_>,
        #[description = "UTC date, YYYY-MM-DD"]
        date: String,
        #[description = "UTC time, HH:MM"]
        time: String
    ) -> Result<()> {
        set_schedule_time(ctx, "End", &date, &time, GiveawayState::set_end_literal).await
    }
}
