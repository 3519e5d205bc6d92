//! Environment configuration for the bot
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.7.0

use anyhow::{Context, Result};
use serenity::model::id::GuildId;

use super::error::RouterError;

/// Introduction shown above the full command listing of `/help`
pub const DEFAULT_HELP_INTRO: &str = "Hello! I route commands for this server.\n\
Use `/help search:<command or group>` to learn more about a specific command or group.\n";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Guilds to register commands for. Empty means every guild from the ready event.
    pub guild_ids: Vec<u64>,
    pub log_level: String,
    pub help_intro: String,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Call `dotenvy::dotenv()` first so a local `.env` file is honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(RouterError::MissingConfig("DISCORD_TOKEN"))?;

        let guild_ids = match lookup("DISCORD_GUILD_IDS") {
            Some(raw) => parse_guild_ids(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            discord_token,
            guild_ids,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            help_intro: lookup("HELP_INTRO").unwrap_or_else(|| DEFAULT_HELP_INTRO.to_string()),
        })
    }

    /// Registration scopes pinned by configuration, if any
    pub fn scopes(&self) -> Option<Vec<GuildId>> {
        if self.guild_ids.is_empty() {
            None
        } else {
            Some(self.guild_ids.iter().copied().map(GuildId).collect())
        }
    }
}

fn parse_guild_ids(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<u64>()
                .with_context(|| format!("DISCORD_GUILD_IDS contains an invalid id: {id}"))
        })
        .collect()
}
