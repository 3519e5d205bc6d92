use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use cmdtree::commands::{load_tree, register_guild_commands, registration_table, Dispatcher};
use cmdtree::core::Config;

struct Bot {
    dispatcher: Dispatcher,
    scopes: Option<Vec<GuildId>>,
}

#[async_trait]
impl EventHandler for Bot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        let scopes = match &self.scopes {
            Some(scopes) => scopes.clone(),
            None => ready.guilds.iter().map(|guild| guild.id).collect(),
        };

        for guild_id in scopes {
            match register_guild_commands(&ctx.http, self.dispatcher.tree(), guild_id).await {
                Ok(count) => info!("✅ Registered {count} commands for guild {guild_id}"),
                Err(e) => error!("❌ Failed to register commands for guild {guild_id}: {e}"),
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        // the client's Http carries the application id that follow-ups need
        self.dispatcher
            .dispatch(Arc::clone(&ctx.http), interaction)
            .await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting command tree bot...");

    let tree = load_tree(&registration_table()).await?;
    info!("🌳 Loaded {} commands", tree.command_count());

    let bot = Bot {
        dispatcher: Dispatcher::new(Arc::new(tree), config.help_intro.clone()),
        scopes: config.scopes(),
    };

    let intents = GatewayIntents::GUILDS | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(bot)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Establishing WebSocket connection to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
