use color_eyre::eyre::Result;
use serenity::all::RoleId;
use tokio::sync::{Mutex, MutexGuard};

use crate::{
    data::{state::GiveawayState, Command, Context},
    platform::SHORT_NOTICE,
    utils,
};

macro_rules! commands {
    ($($name:ident),* $(,)?) => {
        $(
            pub mod $name;
        )*

        pub fn commands() -> Vec<Command> {
            vec![$( $name::command() ),*]
        }
    };
}

commands! {
    add_role,
    cancel_giveaway,
    draw_winner,
    preview_embed,
    remove_role,
    set_description,
    set_emoji,
    set_end,
    set_start,
    set_title,
    start_giveaway,
    status,
}

/// Declares a giveaway command, usable both as a slash command and with the
/// configured prefix. The body gets at the giveaway through
/// [`operator_state`].
macro_rules! command {
    (
        $(#[$attr:meta])*
        pub async fn $name:ident($($args:tt)*) -> Result<$ret_ty:ty> $body:block
    ) => {
        pub fn command() -> $crate::data::Command {
            $name()
        }

        $(#[$attr])*
        #[::poise::command(
            slash_command,
            prefix_command,
            guild_only
        )]
        async fn $name($($args)*) -> ::color_eyre::eyre::Result<$ret_ty> $body
    };
}

pub(crate) use command;

/// Whether a member holding `roles` may manage giveaways
pub fn authorized(roles: &[RoleId], allowed: &[RoleId]) -> bool {
    roles.iter().any(|role| allowed.contains(role))
}

/// Lock the giveaway for a caller holding `roles`. Callers who may not manage
/// giveaways never get the lock, so they can't change anything.
pub async fn lock_for_operator<'a>(
    giveaway: &'a Mutex<GiveawayState>,
    roles: &[RoleId],
    allowed: &[RoleId],
) -> Option<MutexGuard<'a, GiveawayState>> {
    if !authorized(roles, allowed) {
        return None;
    }

    Some(giveaway.lock().await)
}

/// The giveaway state, if the author of the command is an operator.
/// Everybody else gets a transient rejection and `None`.
pub async fn operator_state<'a>(
    ctx: Context<'a>,
) -> Result<Option<MutexGuard<'a, GiveawayState>>> {
    let data = ctx.data();
    let roles = match ctx.author_member().await {
        Some(member) => member.roles.clone(),
        None => Vec::new(),
    };

    let state = lock_for_operator(&data.giveaway, &roles, &data.config.operators.roles).await;

    if state.is_none() {
        debug!(user = %ctx.author().id, command = %ctx.command().name, "unauthorized");
        utils::transient_text(
            ctx,
            "❌ You are not allowed to manage giveaways.",
            SHORT_NOTICE,
        )
        .await?;
    }

    Ok(state)
}
