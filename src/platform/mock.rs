//! An in-memory [`Platform`] that records every call.

use std::{collections::HashMap, sync::Mutex, time::Duration};

use poise::serenity_prelude::async_trait;
use serenity::all::{MessageId, RoleId, UserId};

use super::{Announcement, Platform, Reactor, RemoteError, RemoteResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Posted(Announcement),
    Deleted(MessageId),
    Reacted(MessageId, String),
    RemovedReaction(MessageId, UserId, String),
    Announced(String),
    Transient(String, Duration),
    DirectMessage(UserId, String),
    Logged(String, String),
}

#[derive(Debug, Default)]
struct Inner {
    next_message_id: u64,
    reactors: HashMap<MessageId, Vec<Reactor>>,
    roles: HashMap<UserId, Vec<RoleId>>,
    dms_closed: bool,
    reactions_rejected: bool,
    channel_down: bool,
    calls: Vec<Call>,
}

#[derive(Debug, Default)]
pub struct MockPlatform {
    inner: Mutex<Inner>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// A member who reacted to `message_id` holding `roles`
    pub fn add_reactor(&self, message_id: MessageId, user_id: UserId, roles: &[RoleId]) {
        let mut inner = self.inner.lock().unwrap();
        inner.reactors.entry(message_id).or_default().push(Reactor {
            id: user_id,
            bot: false,
        });
        inner.roles.insert(user_id, roles.to_vec());
    }

    pub fn add_bot_reactor(&self, message_id: MessageId, user_id: UserId) {
        let mut inner = self.inner.lock().unwrap();
        inner.reactors.entry(message_id).or_default().push(Reactor {
            id: user_id,
            bot: true,
        });
    }

    pub fn close_dms(&self) {
        self.inner.lock().unwrap().dms_closed = true;
    }

    /// Make every reaction fail as if the emoji didn't exist
    pub fn reject_reactions(&self) {
        self.inner.lock().unwrap().reactions_rejected = true;
    }

    /// Make every events channel call fail until [`MockPlatform::restore_channel`]
    pub fn take_channel_down(&self) {
        self.inner.lock().unwrap().channel_down = true;
    }

    pub fn restore_channel(&self) {
        self.inner.lock().unwrap().channel_down = false;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn posted(&self) -> usize {
        self.count(|call| matches!(call, Call::Posted(_)))
    }

    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.inner.lock().unwrap().calls.iter().filter(|call| f(call)).count()
    }

    fn record(&self, call: Call) {
        self.inner.lock().unwrap().calls.push(call);
    }

    fn channel(&self) -> RemoteResult<()> {
        if self.inner.lock().unwrap().channel_down {
            return Err(RemoteError::Unavailable("the events channel"));
        }

        Ok(())
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn post_announcement(&self, announcement: Announcement) -> RemoteResult<MessageId> {
        self.channel()?;

        let message_id = {
            let mut inner = self.inner.lock().unwrap();
            inner.next_message_id += 1;
            MessageId::new(1000 + inner.next_message_id)
        };
        self.record(Call::Posted(announcement));

        Ok(message_id)
    }

    async fn delete_message(&self, message_id: MessageId) -> RemoteResult<()> {
        self.channel()?;
        self.record(Call::Deleted(message_id));

        Ok(())
    }

    async fn add_reaction(&self, message_id: MessageId, emoji: &str) -> RemoteResult<()> {
        self.channel()?;
        if self.inner.lock().unwrap().reactions_rejected {
            return Err(RemoteError::InvalidEmoji(emoji.to_string()));
        }
        self.record(Call::Reacted(message_id, emoji.to_string()));

        Ok(())
    }

    async fn reactors(&self, message_id: MessageId, _emoji: &str) -> RemoteResult<Vec<Reactor>> {
        self.channel()?;

        Ok(self
            .inner
            .lock()
            .unwrap()
            .reactors
            .get(&message_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn remove_reaction(
        &self,
        message_id: MessageId,
        user_id: UserId,
        emoji: &str,
    ) -> RemoteResult<()> {
        self.channel()?;

        let mut inner = self.inner.lock().unwrap();
        if let Some(reactors) = inner.reactors.get_mut(&message_id) {
            reactors.retain(|reactor| reactor.id != user_id);
        }
        inner.calls.push(Call::RemovedReaction(
            message_id,
            user_id,
            emoji.to_string(),
        ));

        Ok(())
    }

    async fn member_roles(&self, user_id: UserId) -> RemoteResult<Vec<RoleId>> {
        self.inner
            .lock()
            .unwrap()
            .roles
            .get(&user_id)
            .cloned()
            .ok_or(RemoteError::Unavailable("the member"))
    }

    async fn announce(&self, content: String) -> RemoteResult<()> {
        self.channel()?;
        self.record(Call::Announced(content));

        Ok(())
    }

    async fn announce_transient(&self, content: String, lifetime: Duration) -> RemoteResult<()> {
        self.channel()?;
        self.record(Call::Transient(content, lifetime));

        Ok(())
    }

    async fn direct_message(&self, user_id: UserId, content: String) -> RemoteResult<()> {
        if self.inner.lock().unwrap().dms_closed {
            return Err(RemoteError::Unavailable("the direct message channel"));
        }
        self.record(Call::DirectMessage(user_id, content));

        Ok(())
    }

    async fn log_action(&self, title: &str, description: String) -> RemoteResult<()> {
        self.record(Call::Logged(title.to_string(), description));

        Ok(())
    }

    async fn guild_name(&self) -> RemoteResult<String> {
        Ok("Test Guild".to_string())
    }
}
