//! "count words" message menu: word count of the targeted message

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::channel::Message;

use super::count::count_words;
use crate::commands::definition::{create_context_menu, Command, MenuCommand};
use crate::commands::handler::{Handler, HandlerParams};
use crate::commands::reply::{CommandReply, ReplyMessage};

pub fn command() -> Command {
    create_context_menu(MenuCommand::on_message(CountMessageWords))
}

pub struct CountMessageWords;

#[async_trait]
impl Handler<ApplicationCommandInteraction> for CountMessageWords {
    async fn handle(
        &self,
        params: HandlerParams<'_, ApplicationCommandInteraction>,
    ) -> Result<CommandReply> {
        let data = &params.interaction.data;
        let message = data
            .target_id
            .and_then(|target| data.resolved.messages.get(&target.to_message_id()))
            .or_else(|| data.resolved.messages.values().next());

        Ok(ReplyMessage::ephemeral(describe_count(message)).into())
    }
}

fn describe_count(message: Option<&Message>) -> String {
    match message {
        Some(message) => match count_words(&message.content) {
            1 => "That message has 1 word".to_string(),
            words => format!("That message has {words} words"),
        },
        None => "I could not see that message".to_string(),
    }
}
