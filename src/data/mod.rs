use std::sync::Arc;

use color_eyre::eyre::Report;
use serenity::all::Http;
use tokio::sync::Mutex;

use crate::platform::DiscordPlatform;

pub mod config;
pub mod state;

/// The main data struct that contains the config, the giveaway state, and
/// the platform the giveaway talks to.
///
/// Every command, scheduler tick and event handler holds the `giveaway` lock
/// for its whole run, so mutations never interleave.
#[derive(Debug)]
pub struct DataInner {
    pub config: config::AppConfig,
    pub giveaway: Mutex<state::GiveawayState>,
    pub platform: DiscordPlatform,
}

pub fn init(config: config::AppConfig, http: Arc<Http>) -> Data {
    debug!("Initializing giveaway state");
    let giveaway = state::GiveawayState::new(config.giveaway.emoji.clone());
    let platform = DiscordPlatform::new(http, &config.channels);

    Arc::new(DataInner {
        config,
        giveaway: Mutex::new(giveaway),
        platform,
    })
}

pub type Data = Arc<DataInner>;
pub type Error = Report;

// a collection of type aliases for various poise types that take both of these
// type parameters
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type Command = poise::Command<Data, Error>;
pub type FrameworkContext<'a> = poise::FrameworkContext<'a, Data, Error>;
pub type FrameworkError<'a> = poise::FrameworkError<'a, Data, Error>;
