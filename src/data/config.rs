use std::path::PathBuf;

use color_eyre::eyre::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use serenity::all::{ChannelId, RoleId};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// The Discord token used to authenticate the bot
    pub token: String,
    /// The prefix for text commands. Every command is also registered as a
    /// slash command.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// The channels the bot posts into
    pub channels: ChannelsConfig,
    /// Defaults for newly configured giveaways
    #[serde(default)]
    pub giveaway: GiveawayDefaults,
    /// Who is allowed to manage giveaways
    #[serde(default)]
    pub operators: OperatorsConfig,
}

fn default_prefix() -> String {
    "!".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChannelsConfig {
    /// The channel where giveaways are announced and winners are drawn
    pub events: ChannelId,
    /// The channel receiving an audit embed for every giveaway action
    pub logs: ChannelId,
}

#[derive(Debug, Deserialize)]
pub struct GiveawayDefaults {
    /// The entry emoji a giveaway starts with, and is reset to after every
    /// draw or cancellation
    #[serde(default = "default_emoji")]
    pub emoji: String,
}

impl Default for GiveawayDefaults {
    fn default() -> Self {
        Self {
            emoji: default_emoji(),
        }
    }
}

fn default_emoji() -> String {
    "🎉".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct OperatorsConfig {
    /// Members holding any of these roles may use the giveaway commands.
    /// Nobody is authorized when this is empty.
    #[serde(default)]
    pub roles: Vec<RoleId>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_file = match std::env::var("DONARIUS_CONFIG") {
            Ok(path) => PathBuf::from(path),
            Err(_) => {
                let mut path = std::env::current_dir()?;
                path.push("donarius.toml");
                path
            }
        };
        trace!("Loading configuration from {:?}", config_file);

        let config = Self::figment(config_file).extract::<AppConfig>()?;

        Ok(config)
    }

    fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Toml::file(config_file))
            .merge(Env::raw().only(&["DISCORD_TOKEN"]).map(|_| "token".into()))
            .merge(Env::prefixed("DONARIUS_").global().split('_'))
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn loads_file_with_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "donarius.toml",
                r#"
                token = "secret"

                [channels]
                events = 100
                logs = 200
                "#,
            )?;

            let config = AppConfig::figment("donarius.toml".into()).extract::<AppConfig>()?;

            assert_eq!(config.token, "secret");
            assert_eq!(config.prefix, "!");
            assert_eq!(config.channels.events, ChannelId::new(100));
            assert_eq!(config.channels.logs, ChannelId::new(200));
            assert_eq!(config.giveaway.emoji, "🎉");
            assert!(config.operators.roles.is_empty());

            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "donarius.toml",
                r#"
                token = "from-file"
                prefix = "?"

                [channels]
                events = 100
                logs = 200

                [operators]
                roles = [1, 2]
                "#,
            )?;
            jail.set_env("DISCORD_TOKEN", "from-discord-env");
            jail.set_env("DONARIUS_CHANNELS_LOGS", "300");
            jail.set_env("DONARIUS_GIVEAWAY_EMOJI", "🎁");

            let config = AppConfig::figment("donarius.toml".into()).extract::<AppConfig>()?;

            assert_eq!(config.token, "from-discord-env");
            assert_eq!(config.prefix, "?");
            assert_eq!(config.channels.logs, ChannelId::new(300));
            assert_eq!(config.giveaway.emoji, "🎁");
            assert_eq!(config.operators.roles, vec![RoleId::new(1), RoleId::new(2)]);

            Ok(())
        });
    }

    #[test]
    fn missing_channels_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("donarius.toml", r#"token = "secret""#)?;

            let result = AppConfig::figment("donarius.toml".into()).extract::<AppConfig>();
            assert!(result.is_err());

            Ok(())
        });
    }
}
