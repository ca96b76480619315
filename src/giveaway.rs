use std::fmt;

use chrono::{DateTime, Utc};
use rand::{seq::SliceRandom, Rng};
use serenity::all::{MessageId, RoleId, UserId};

use crate::{
    data::state::GiveawayState,
    platform::{Announcement, Platform, RemoteError, DM_FAILURE_NOTICE, SHORT_NOTICE},
    utils::mention,
};

/// What caused a giveaway to be opened
#[derive(Debug, Clone, Copy)]
pub enum OpenTrigger {
    /// An operator ran the command
    Manual(UserId),
    /// The scheduler reached the start time
    Scheduled(DateTime<Utc>),
}

#[derive(Debug)]
pub enum GiveawayError {
    /// Only one giveaway may be open at a time
    AlreadyOpen(MessageId),
    /// The entry emoji couldn't be added, so nobody could enter
    EntryReaction { emoji: String, source: RemoteError },
    Remote(RemoteError),
}

impl fmt::Display for GiveawayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiveawayError::AlreadyOpen(message_id) => {
                write!(f, "a giveaway is already open (message {})", message_id)
            }
            GiveawayError::EntryReaction { emoji, source } => {
                write!(f, "could not react with {}: {}", emoji, source)
            }
            GiveawayError::Remote(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GiveawayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GiveawayError::EntryReaction { source, .. } => Some(source),
            GiveawayError::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RemoteError> for GiveawayError {
    fn from(err: RemoteError) -> Self {
        GiveawayError::Remote(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    NotOpen,
    NoReactions,
    NoEligibleUsers,
    Winner(UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationOutcome {
    /// No open giveaway, no role restriction, or no eligible role was lost
    Ignored,
    /// The member lost an eligible role but had not entered
    NotEntered,
    Revoked,
}

/// Post the announcement for the configured giveaway, react with the entry
/// emoji and start tracking it.
pub async fn open_giveaway<P>(
    state: &mut GiveawayState,
    platform: &P,
    trigger: OpenTrigger,
) -> Result<MessageId, GiveawayError>
where
    P: Platform + ?Sized,
{
    if let Some(message_id) = state.announcement() {
        return Err(GiveawayError::AlreadyOpen(message_id));
    }

    let config = state.config();
    let message_id = platform
        .post_announcement(Announcement {
            title: config.title.clone(),
            description: config.description.clone(),
        })
        .await?;

    // an announcement nobody can react to is taken down again
    if let Err(source) = platform.add_reaction(message_id, &config.emoji).await {
        warn!("failed to add the entry reaction to {}: {}", message_id, source);

        if let Err(err) = platform.delete_message(message_id).await {
            warn!("failed to delete announcement {}: {}", message_id, err);
        }

        return Err(GiveawayError::EntryReaction {
            emoji: config.emoji.clone(),
            source,
        });
    }

    state.record_run(message_id);

    let (title, description) = match trigger {
        OpenTrigger::Manual(user_id) => {
            info!(%message_id, %user_id, "giveaway posted");
            ("Giveaway Posted", format!("Posted by {}", mention(user_id)))
        }
        OpenTrigger::Scheduled(now) => {
            info!(%message_id, "giveaway started automatically");
            (
                "Giveaway Started Automatically",
                format!("Giveaway started at scheduled time {}", now.to_rfc3339()),
            )
        }
    };
    log_action(platform, title, description).await;

    Ok(message_id)
}

/// Pick one of the eligible users uniformly at random
pub fn pick_winner<R>(eligible: &[UserId], rng: &mut R) -> Option<UserId>
where
    R: Rng + ?Sized,
{
    eligible.choose(rng).copied()
}

/// Draw a winner among the current eligible reactors of the open giveaway,
/// announce them and reset the giveaway.
///
/// Nothing changes when there is nobody to draw from. Otherwise the state is
/// reset once the winner is announced, even if they could not be notified
/// privately.
pub async fn draw_winner<P, R>(
    state: &mut GiveawayState,
    platform: &P,
    rng: &mut R,
) -> Result<DrawOutcome, RemoteError>
where
    P: Platform + ?Sized,
    R: Rng + Send + ?Sized,
{
    let Some(message_id) = state.announcement() else {
        debug!("no open giveaway to draw");
        return Ok(DrawOutcome::NotOpen);
    };

    let config = state.config();
    let reactors = platform.reactors(message_id, &config.emoji).await?;

    if reactors.is_empty() {
        notice(platform, "❌ No reactions found.".to_string()).await;
        return Ok(DrawOutcome::NoReactions);
    }

    let mut eligible = Vec::with_capacity(reactors.len());
    for reactor in reactors.into_iter().filter(|reactor| !reactor.bot) {
        if config.eligible_roles.is_unrestricted() {
            eligible.push(reactor.id);
            continue;
        }

        match platform.member_roles(reactor.id).await {
            Ok(roles) if config.eligible_roles.admits(&roles) => eligible.push(reactor.id),
            Ok(_) => {}
            Err(err) => {
                debug!("skipping reactor {} without member roles: {}", reactor.id, err);
            }
        }
    }

    let Some(winner) = pick_winner(&eligible, rng) else {
        notice(platform, "❌ No eligible users.".to_string()).await;
        return Ok(DrawOutcome::NoEligibleUsers);
    };

    platform
        .announce(format!(
            "🎉 Congratulations {}! You won the giveaway! 🎉",
            mention(winner)
        ))
        .await?;

    let guild_name = platform
        .guild_name()
        .await
        .unwrap_or_else(|_| "the server".to_string());

    if let Err(err) = platform
        .direct_message(
            winner,
            format!(
                "🎉 Congratulations! You won the giveaway in **{}**! 🎉",
                guild_name
            ),
        )
        .await
    {
        debug!("could not DM winner {}: {}", winner, err);

        if let Err(err) = platform
            .announce_transient(
                format!(
                    "⚠️ Could not DM {}, but they won the giveaway!",
                    mention(winner)
                ),
                DM_FAILURE_NOTICE,
            )
            .await
        {
            warn!("failed to post DM failure notice: {}", err);
        }
    }

    info!(%message_id, %winner, eligible = eligible.len(), "giveaway winner drawn");
    log_action(
        platform,
        "Giveaway Winner Drawn",
        format!("Winner: {} (Scheduled or manual)", mention(winner)),
    )
    .await;

    state.reset();

    Ok(DrawOutcome::Winner(winner))
}

/// Forget the current giveaway, open or not, along with its configuration and
/// schedule.
pub async fn cancel_giveaway<P>(state: &mut GiveawayState, platform: &P, user_id: UserId)
where
    P: Platform + ?Sized,
{
    let announcement = state.announcement();
    state.reset();

    info!(?announcement, %user_id, "giveaway cancelled");
    log_action(
        platform,
        "Giveaway Cancelled",
        format!("Cancelled by {}", mention(user_id)),
    )
    .await;
}

/// Remove the entry of a member who lost an eligible role while the giveaway
/// is open.
///
/// `before` is `None` when the member's previous roles weren't cached. Their
/// entry is then revoked if none of the roles in `after` is eligible.
/// Gaining a role never restores an entry.
pub async fn revoke_entry<P>(
    state: &GiveawayState,
    platform: &P,
    user_id: UserId,
    before: Option<&[RoleId]>,
    after: &[RoleId],
) -> Result<RevocationOutcome, RemoteError>
where
    P: Platform + ?Sized,
{
    let config = state.config();

    let Some(message_id) = state.announcement() else {
        return Ok(RevocationOutcome::Ignored);
    };
    if config.eligible_roles.is_unrestricted() {
        return Ok(RevocationOutcome::Ignored);
    }

    let lost = match before {
        Some(before) => before
            .iter()
            .filter(|role| !after.contains(role))
            .copied()
            .collect::<Vec<_>>(),
        // uncached member: whoever has no eligible role left can't stay entered
        None if config.eligible_roles.admits(after) => return Ok(RevocationOutcome::Ignored),
        None => Vec::new(),
    };
    if before.is_some() && !config.eligible_roles.intersects(&lost) {
        return Ok(RevocationOutcome::Ignored);
    }

    let reactors = platform.reactors(message_id, &config.emoji).await?;
    if !reactors.iter().any(|reactor| reactor.id == user_id) {
        return Ok(RevocationOutcome::NotEntered);
    }

    platform
        .remove_reaction(message_id, user_id, &config.emoji)
        .await?;
    info!(%message_id, %user_id, "giveaway entry revoked");

    if let Err(err) = platform
        .direct_message(
            user_id,
            "⚠️ Your giveaway entry was removed because you no longer have an eligible role."
                .to_string(),
        )
        .await
    {
        debug!("could not DM {} about the revoked entry: {}", user_id, err);
    }

    log_action(
        platform,
        "Giveaway Entry Revoked",
        format!("{} lost an eligible role", mention(user_id)),
    )
    .await;

    Ok(RevocationOutcome::Revoked)
}

/// A public notice in the events channel that disappears shortly after
async fn notice<P>(platform: &P, content: String)
where
    P: Platform + ?Sized,
{
    if let Err(err) = platform.announce_transient(content, SHORT_NOTICE).await {
        warn!("failed to post notice: {}", err);
    }
}

/// Audit embeds are best effort
pub async fn log_action<P>(platform: &P, title: &str, description: String)
where
    P: Platform + ?Sized,
{
    if let Err(err) = platform.log_action(title, description).await {
        warn!("failed to log {:?}: {}", title, err);
    }
}
