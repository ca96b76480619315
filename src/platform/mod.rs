//! The chat platform as seen by the giveaway logic.
//!
//! Everything the giveaway does remotely goes through [`Platform`], which is
//! bound to the configured announcement and log channels. Each call reports
//! failure explicitly and the caller decides whether that aborts what it is
//! doing or is just skipped.

use std::{fmt, time::Duration};

use poise::serenity_prelude::async_trait;
use serenity::all::{MessageId, RoleId, UserId};

mod discord;
#[cfg(test)]
pub mod mock;

pub use discord::DiscordPlatform;

/// How long a confirmation or a "nothing to draw" notice stays visible
pub const SHORT_NOTICE: Duration = Duration::from_secs(5);
/// How long a format error stays visible
pub const FORMAT_NOTICE: Duration = Duration::from_secs(10);
/// How long the notice about an undeliverable winner DM stays visible
pub const DM_FAILURE_NOTICE: Duration = Duration::from_secs(15);
/// How long an embed preview stays visible
pub const PREVIEW_NOTICE: Duration = Duration::from_secs(20);

/// A giveaway announcement, rendered as an embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub description: String,
}

/// A user who reacted with the entry emoji
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reactor {
    pub id: UserId,
    pub bot: bool,
}

#[derive(Debug)]
pub enum RemoteError {
    Serenity(serenity::Error),
    InvalidEmoji(String),
    Unavailable(&'static str),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Serenity(err) => write!(f, "{}", err),
            RemoteError::InvalidEmoji(emoji) => write!(f, "{:?} is not a usable emoji", emoji),
            RemoteError::Unavailable(what) => write!(f, "{} is unavailable", what),
        }
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RemoteError::Serenity(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serenity::Error> for RemoteError {
    fn from(err: serenity::Error) -> Self {
        RemoteError::Serenity(err)
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

#[async_trait]
pub trait Platform: Send + Sync {
    /// Post an announcement in the events channel
    async fn post_announcement(&self, announcement: Announcement) -> RemoteResult<MessageId>;

    /// Delete a message from the events channel
    async fn delete_message(&self, message_id: MessageId) -> RemoteResult<()>;

    /// React to an announcement with the entry emoji
    async fn add_reaction(&self, message_id: MessageId, emoji: &str) -> RemoteResult<()>;

    /// Everyone who currently reacted to an announcement with `emoji`
    async fn reactors(&self, message_id: MessageId, emoji: &str) -> RemoteResult<Vec<Reactor>>;

    async fn remove_reaction(
        &self,
        message_id: MessageId,
        user_id: UserId,
        emoji: &str,
    ) -> RemoteResult<()>;

    /// The current roles of a guild member, fetched live
    async fn member_roles(&self, user_id: UserId) -> RemoteResult<Vec<RoleId>>;

    /// Send a message to the events channel
    async fn announce(&self, content: String) -> RemoteResult<()>;

    /// Send a message to the events channel that removes itself after
    /// `lifetime`
    async fn announce_transient(&self, content: String, lifetime: Duration) -> RemoteResult<()>;

    async fn direct_message(&self, user_id: UserId, content: String) -> RemoteResult<()>;

    /// Post an audit embed in the log channel
    async fn log_action(&self, title: &str, description: String) -> RemoteResult<()>;

    async fn guild_name(&self) -> RemoteResult<String>;
}
