use poise::CreateReply;
use serenity::all::{Colour, CreateEmbed};

use crate::{data::Context, platform::PREVIEW_NOTICE, utils};

super::command! {
    /// Show what the next giveaway announcement will look like
    pub async fn preview_embed(ctx: Context<'_>) -> Result<()> {
        let Some(state) = super::operator_state(ctx).await? else {
            return Ok(());
        };

        let config = state.config();
        let embed = CreateEmbed::new()
            .title(&config.title)
            .description(format!(
                "{}\n\n**Eligible Roles:** {}\n**Entry Emoji:** {}",
                config.description, config.eligible_roles, config.emoji
            ))
            .colour(Colour::DARK_GREEN);
        drop(state);

        utils::transient_reply(ctx, CreateReply::default().embed(embed), PREVIEW_NOTICE).await
    }
}
