use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;

use crate::{
    data::{
        state::{GiveawayState, ScheduleFormatError, SCHEDULE_FORMAT_HINT},
        Context,
    },
    giveaway::log_action,
    platform::{FORMAT_NOTICE, SHORT_NOTICE},
    utils,
};

type SetLiteral = fn(&mut GiveawayState, &str, &str) -> Result<DateTime<Utc>, ScheduleFormatError>;

super::command! {
    /// Open the giveaway automatically at this UTC time (YYYY-MM-DD HH:MM)
    pub async fn set_start(
        ctx: Context<'_>,
        #[description = "UTC date, YYYY-MM-DD"]
        date: String,
        #[description = "UTC time, HH:MM"]
        time: String
    ) -> Result<()> {
        set_schedule_time(ctx, "Start", &date, &time, GiveawayState::set_start_literal).await
    }
}

/// Store the literal with `set` and log it. A malformed literal leaves the
/// schedule untouched.
pub async fn set_schedule_time(
    ctx: Context<'_>,
    which: &str,
    date: &str,
    time: &str,
    set: SetLiteral,
) -> Result<()> {
    let Some(mut state) = super::operator_state(ctx).await? else {
        return Ok(());
    };

    let at = match set(&mut state, date, time) {
        Ok(at) => at,
        Err(err) => {
            drop(state);
            debug!("rejected schedule time: {}", err);

            return utils::transient_text(
                ctx,
                format!("❌ Invalid date/time format. Use {}", SCHEDULE_FORMAT_HINT),
                FORMAT_NOTICE,
            )
            .await;
        }
    };

    info!(%at, "giveaway {} time set", which.to_lowercase());
    log_action(
        &ctx.data().platform,
        &format!("Giveaway {} Set", which),
        format!("{} time set to {} UTC", which, at.to_rfc3339()),
    )
    .await;
    drop(state);

    utils::transient_text(
        ctx,
        format!("✅ {} time set to {} UTC", which, at.to_rfc3339()),
        SHORT_NOTICE,
    )
    .await
}
