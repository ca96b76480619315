use std::{fmt, sync::Arc, time::Duration};

use poise::serenity_prelude::async_trait;
use serenity::all::{
    ChannelId, Colour, CreateEmbed, CreateMessage, GuildId, Http, MessageId, ReactionType,
    RoleId, UserId,
};
use tokio::sync::OnceCell;

use super::{Announcement, Platform, Reactor, RemoteError, RemoteResult};
use crate::data::config::ChannelsConfig;

/// Discord allows at most this many reactors per request
const REACTORS_PAGE_SIZE: u8 = 100;

/// [`Platform`] backed by the Discord HTTP API.
pub struct DiscordPlatform {
    http: Arc<Http>,
    events_channel: ChannelId,
    logs_channel: ChannelId,
    /// Resolved from the events channel on first use
    guild_id: OnceCell<GuildId>,
}

impl fmt::Debug for DiscordPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordPlatform")
            .field("events_channel", &self.events_channel)
            .field("logs_channel", &self.logs_channel)
            .field("guild_id", &self.guild_id.get())
            .finish_non_exhaustive()
    }
}

impl DiscordPlatform {
    pub fn new(http: Arc<Http>, channels: &ChannelsConfig) -> Self {
        Self {
            http,
            events_channel: channels.events,
            logs_channel: channels.logs,
            guild_id: OnceCell::new(),
        }
    }

    fn http(&self) -> &Http {
        &self.http
    }

    async fn guild_id(&self) -> RemoteResult<GuildId> {
        self.guild_id
            .get_or_try_init(|| async {
                let channel = self.events_channel.to_channel(self.http()).await?;

                channel
                    .guild()
                    .map(|channel| channel.guild_id)
                    .ok_or(RemoteError::Unavailable("a guild for the events channel"))
            })
            .await
            .copied()
    }
}

fn reaction_type(emoji: &str) -> RemoteResult<ReactionType> {
    ReactionType::try_from(emoji).map_err(|_| RemoteError::InvalidEmoji(emoji.to_string()))
}

#[async_trait]
impl Platform for DiscordPlatform {
    async fn post_announcement(&self, announcement: Announcement) -> RemoteResult<MessageId> {
        let embed = CreateEmbed::new()
            .title(announcement.title)
            .description(announcement.description)
            .colour(Colour::BLUE);

        let message = self
            .events_channel
            .send_message(self.http(), CreateMessage::new().embed(embed))
            .await?;

        Ok(message.id)
    }

    async fn delete_message(&self, message_id: MessageId) -> RemoteResult<()> {
        self.events_channel
            .delete_message(self.http(), message_id)
            .await?;

        Ok(())
    }

    async fn add_reaction(&self, message_id: MessageId, emoji: &str) -> RemoteResult<()> {
        self.events_channel
            .create_reaction(self.http(), message_id, reaction_type(emoji)?)
            .await?;

        Ok(())
    }

    async fn reactors(&self, message_id: MessageId, emoji: &str) -> RemoteResult<Vec<Reactor>> {
        let reaction = reaction_type(emoji)?;
        let mut reactors = Vec::new();
        let mut after: Option<UserId> = None;

        loop {
            let page = self
                .events_channel
                .reaction_users(
                    self.http(),
                    message_id,
                    reaction.clone(),
                    Some(REACTORS_PAGE_SIZE),
                    after,
                )
                .await?;

            let full_page = page.len() == usize::from(REACTORS_PAGE_SIZE);
            after = page.last().map(|user| user.id);

            reactors.extend(page.into_iter().map(|user| Reactor {
                id: user.id,
                bot: user.bot,
            }));

            if !full_page {
                break;
            }
        }

        trace!(count = reactors.len(), %message_id, "fetched reactors");

        Ok(reactors)
    }

    async fn remove_reaction(
        &self,
        message_id: MessageId,
        user_id: UserId,
        emoji: &str,
    ) -> RemoteResult<()> {
        self.events_channel
            .delete_reaction(self.http(), message_id, Some(user_id), reaction_type(emoji)?)
            .await?;

        Ok(())
    }

    async fn member_roles(&self, user_id: UserId) -> RemoteResult<Vec<RoleId>> {
        let guild_id = self.guild_id().await?;
        let member = self.http.get_member(guild_id, user_id).await?;

        Ok(member.roles)
    }

    async fn announce(&self, content: String) -> RemoteResult<()> {
        self.events_channel
            .send_message(self.http(), CreateMessage::new().content(content))
            .await?;

        Ok(())
    }

    async fn announce_transient(&self, content: String, lifetime: Duration) -> RemoteResult<()> {
        let message = self
            .events_channel
            .send_message(self.http(), CreateMessage::new().content(content))
            .await?;

        let http = self.http.clone();
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;

            if let Err(err) = message.delete(&*http).await {
                debug!("failed to remove transient notice: {:?}", err);
            }
        });

        Ok(())
    }

    async fn direct_message(&self, user_id: UserId, content: String) -> RemoteResult<()> {
        user_id
            .create_dm_channel(self.http())
            .await?
            .send_message(self.http(), CreateMessage::new().content(content))
            .await?;

        Ok(())
    }

    async fn log_action(&self, title: &str, description: String) -> RemoteResult<()> {
        let embed = CreateEmbed::new()
            .title(title)
            .description(description)
            .colour(Colour::ORANGE);

        self.logs_channel
            .send_message(self.http(), CreateMessage::new().embed(embed))
            .await?;

        Ok(())
    }

    async fn guild_name(&self) -> RemoteResult<String> {
        let guild_id = self.guild_id().await?;
        let guild = guild_id.to_partial_guild(self.http()).await?;

        Ok(guild.name)
    }
}
