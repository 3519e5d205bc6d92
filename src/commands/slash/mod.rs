//! # Slash Commands (/)
//!
//! Guild registration of the loaded command tree plus the built-in `/help`,
//! and option accessors shared by command handlers.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Register descriptors collected from the command tree per guild
//! - 2.0.0: Consolidate plugins into single /plugins command with subcommands
//! - 1.0.0: Reorganized from monolithic slash_commands.rs

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::http::Http;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::id::GuildId;

use super::descriptors::collect_descriptors;
use super::tree::CommandTree;
use crate::core::RouterError;

/// Name of the built-in help command
pub const HELP_COMMAND: &str = "help";
pub const HELP_SEARCH_OPTION: &str = "search";

/// Descriptor of the built-in `/help [search]`
pub fn create_help_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name(HELP_COMMAND)
        .description("shows help text")
        .create_option(|option| {
            option
                .name(HELP_SEARCH_OPTION)
                .description("What command/group to search for")
                .kind(CommandOptionType::String)
                .required(false)
        });
    command
}

/// Every descriptor registered for a guild: the tree's, then `/help`
pub async fn create_guild_commands(
    tree: &CommandTree,
    guild_id: GuildId,
) -> Result<Vec<CreateApplicationCommand>> {
    let mut commands = collect_descriptors(tree, guild_id).await?;
    commands.push(create_help_command());
    Ok(commands)
}

/// Replace the guild's registered commands with the tree's descriptors
///
/// Returns how many commands were registered.
pub async fn register_guild_commands(
    http: &Http,
    tree: &CommandTree,
    guild_id: GuildId,
) -> Result<usize, RouterError> {
    let registration_error = |reason: String| RouterError::Registration {
        scope: guild_id.0,
        reason,
    };

    let commands = create_guild_commands(tree, guild_id)
        .await
        .map_err(|e| registration_error(format!("{e:#}")))?;
    let count = commands.len();

    guild_id
        .set_application_commands(http, |builder| {
            for command in commands {
                builder.add_application_command(command);
            }
            builder
        })
        .await
        .map_err(|e| registration_error(e.to_string()))?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(count)
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Utility function to get channel option from slash command
pub fn get_channel_option(options: &[CommandDataOption], name: &str) -> Option<u64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .and_then(|s| s.parse().ok())
}

/// What the user has typed so far into the option being autocompleted
pub fn focused_option_value(options: &[CommandDataOption]) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.focused)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
