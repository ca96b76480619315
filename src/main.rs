use color_eyre::eyre::Result;
use poise::{Framework, FrameworkOptions, PrefixFrameworkOptions};
use serenity::all::{ActivityData, ClientBuilder, GatewayIntents};
use tracing_subscriber::prelude::*;

use crate::{data::config::AppConfig, scheduler::scheduler_task};

#[macro_use]
extern crate tracing;

pub mod command;
pub mod data;
pub mod error;
pub mod giveaway;
pub mod handler;
pub mod platform;
pub mod scheduler;
pub mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_error::ErrorLayer::default())
        .init();

    color_eyre::install()?;

    debug!("Loading configuration");
    let config = AppConfig::load()?;
    let token = config.token.clone();
    let prefix = config.prefix.clone();

    let intents =
        // resolve operators and eligible roles
        GatewayIntents::GUILDS
        // role changes revoke entries
        | GatewayIntents::GUILD_MEMBERS
        // text commands
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        // entries
        | GatewayIntents::GUILD_MESSAGE_REACTIONS;

    debug!(?intents, "Starting bot");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: command::commands(),
            prefix_options: PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            on_error: error::handle_error,
            event_handler: handler::event_handler,
            // we don't use the owner system so just disable it entirely
            initialize_owners: false,
            skip_checks_for_owners: false,
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                trace!("registering commands");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let data = data::init(config, ctx.http.clone());

                // start the giveaway scheduler
                tokio::task::spawn(scheduler_task(data.clone()));

                ctx.set_activity(Some(ActivityData::watching("for giveaway entries")));

                Ok(data)
            })
        })
        .build();

    debug!("Creating client");
    let mut client = ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting up");
    client.start().await?;

    Ok(())
}
