use chrono::{DateTime, Utc};
use poise::CreateReply;
use serenity::all::{Colour, CreateEmbed};

use crate::{data::Context, platform::PREVIEW_NOTICE, utils};

fn format_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => format!("<t:{}:F>", at.timestamp()),
        None => "not set".to_string(),
    }
}

super::command! {
    /// Show whether a giveaway is running and when it is scheduled
    pub async fn status(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();

        let embed = {
            let Some(state) = super::operator_state(ctx).await? else {
                return Ok(());
            };
            let schedule = state.schedule();

            let running = match state.announcement() {
                Some(message_id) => format!(
                    "Running: {}",
                    message_id.link(data.config.channels.events, ctx.guild_id())
                ),
                None => "No giveaway is running".to_string(),
            };

            CreateEmbed::new()
                .title(&state.config().title)
                .description(format!(
                    "{}\n\n**Start:** {}\n**End:** {}",
                    running,
                    format_time(schedule.start),
                    format_time(schedule.end)
                ))
                .colour(Colour::BLUE)
        };

        utils::transient_reply(ctx, CreateReply::default().embed(embed), PREVIEW_NOTICE).await
    }
}
