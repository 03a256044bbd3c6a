use crate::deadline::DEFAULT_DEADLINE_TIME;
use crate::error::ConfigError;
use chrono::NaiveTime;
use poise::serenity_prelude::{ChannelId, GuildId};

pub struct Config {
    pub token: String,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub database_url: String,
    /// Time of day (UTC) a date-only deadline is pinned to
    pub deadline_time: NaiveTime,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &'static str| lookup(var).ok_or(ConfigError::Missing(var));

        let deadline_time = match lookup("DEADLINE_TIME") {
            Some(value) => NaiveTime::parse_from_str(value.trim(), "%H:%M")
                .map_err(|_| ConfigError::Invalid { var: "DEADLINE_TIME", value })?,
            None => DEFAULT_DEADLINE_TIME,
        };

        Ok(Config {
            token: required("DISCORD_TOKEN")?,
            guild_id: GuildId::new(parse_snowflake("GUILD_ID", required("GUILD_ID")?)?),
            channel_id: ChannelId::new(parse_snowflake("CHANNEL_ID", required("CHANNEL_ID")?)?),
            database_url: required("DATABASE_URL")?,
            deadline_time,
        })
    }
}

fn parse_snowflake(var: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(ConfigError::Invalid { var, value }),
    }
}
