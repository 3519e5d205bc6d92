//! `/count`: words per member across a whole thread
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Threads can hold thousands of messages, so the reply is deferred and the
//! original response is rewritten with progress after every fetched batch.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serenity::http::Http;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::channel::{Channel, ChannelType, Message};
use serenity::model::id::{ChannelId, GuildId, MessageId};

use crate::commands::definition::{create_command, Command, SlashCommand};
use crate::commands::handler::{Handler, HandlerParams};
use crate::commands::reply::{CommandReply, ReplyMessage, Responder};
use crate::commands::slash::get_channel_option;
use crate::core::{chunk_text, MESSAGE_LIMIT};

pub const THREAD_OPTION: &str = "thread";

/// Discord's page size for message history
const BATCH_SIZE: u64 = 100;
const BATCH_PAUSE: Duration = Duration::from_millis(40);
/// Room for the code fence around each table chunk
const FENCE_OVERHEAD: usize = 8;

pub fn command() -> Command {
    create_command(
        "Count all words, grouped by all members inside a thread",
        SlashCommand::new(CountWords).describe_with(|cmd, _| {
            cmd.create_option(|option| {
                option
                    .name(THREAD_OPTION)
                    .description("The thread to count")
                    .kind(CommandOptionType::Channel)
                    .required(true)
                    .channel_types(&[ChannelType::PublicThread, ChannelType::PrivateThread])
            });
        }),
    )
}

/// Words in a message, ignoring runs of whitespace
pub fn count_words(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Word totals per author, in first-seen order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WordTally {
    counts: Vec<(String, usize)>,
}

impl WordTally {
    pub fn add(&mut self, author: &str, content: &str) {
        let words = count_words(content);
        match self.counts.iter_mut().find(|(name, _)| name == author) {
            Some((_, total)) => *total += words,
            None => self.counts.push((author.to_string(), words)),
        }
    }

    /// Plain-text table, largest totals first
    pub fn render_table(&self) -> String {
        let mut sorted: Vec<&(String, usize)> = self.counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        let rows: Vec<(&str, String)> = sorted
            .into_iter()
            .map(|(name, total)| (name.as_str(), total.to_string()))
            .collect();

        let name_width = rows
            .iter()
            .map(|(name, _)| name.chars().count())
            .chain(std::iter::once("Username".len()))
            .max()
            .unwrap_or_default();
        let count_width = rows
            .iter()
            .map(|(_, count)| count.len())
            .chain(std::iter::once("count".len()))
            .max()
            .unwrap_or_default();

        let border = format!("+{}+{}+", "-".repeat(name_width + 2), "-".repeat(count_width + 2));
        let mut lines = vec![
            border.clone(),
            format!("| {:<name_width$} | {:<count_width$} |", "Username", "count"),
            border.clone(),
        ];
        for (name, count) in &rows {
            lines.push(format!("| {name:<name_width$} | {count:>count_width$} |"));
        }
        lines.push(border);
        lines.join("\n")
    }
}

/// The final messages: the fenced table, split to fit, then the link
pub fn render_result(table: &str, last_message_link: &str) -> Vec<String> {
    let single = format!("```\n{table}\n```\n\nLast message: {last_message_link}");
    if single.len() <= MESSAGE_LIMIT {
        return vec![single];
    }
    let mut messages: Vec<String> = chunk_text(table, MESSAGE_LIMIT - FENCE_OVERHEAD)
        .into_iter()
        .map(|chunk| format!("```\n{chunk}\n```"))
        .collect();
    messages.push(format!("Last message: {last_message_link}"));
    messages
}

pub fn message_link(guild_id: Option<GuildId>, channel_id: ChannelId, message_id: MessageId) -> String {
    let guild = guild_id.map_or_else(|| "@me".to_string(), |id| id.to_string());
    format!("https://discord.com/channels/{guild}/{channel_id}/{message_id}")
}

fn is_thread(channel: &Channel) -> bool {
    matches!(
        channel,
        Channel::Guild(guild_channel) if matches!(
            guild_channel.kind,
            ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::NewsThread
        )
    )
}

pub struct CountWords;

#[async_trait]
impl Handler<ApplicationCommandInteraction> for CountWords {
    async fn handle(
        &self,
        params: HandlerParams<'_, ApplicationCommandInteraction>,
    ) -> Result<CommandReply> {
        params.responder.defer(false).await?;

        let Some(thread_id) = get_channel_option(&params.interaction.data.options, THREAD_OPTION)
        else {
            return Ok("I need a channel to work with".into());
        };
        let thread_id = ChannelId(thread_id);
        let http: &Http = &params.context.http;
        if !is_thread(&thread_id.to_channel(http).await?) {
            return Ok("I can only count words in threads".into());
        }

        let (tally, last_message) = fetch_all(http, thread_id, params.responder).await?;
        let Some(last_message) = last_message else {
            return Ok("No messages in thread".into());
        };

        let link = message_link(params.interaction.guild_id, thread_id, last_message.id);
        let mut messages = render_result(&tally.render_table(), &link);
        let last = messages.pop().unwrap_or_default();
        for message in messages {
            params.responder.send(message.into()).await?;
        }
        Ok(last.into())
    }
}

/// Walk the thread history from newest to oldest, tallying every message
///
/// Returns the tally and the oldest message processed.
async fn fetch_all(
    http: &Http,
    thread_id: ChannelId,
    responder: &Responder<'_, ApplicationCommandInteraction>,
) -> Result<(WordTally, Option<Message>)> {
    let mut tally = WordTally::default();
    let mut last_processed: Option<Message> = None;
    let mut total = 0usize;

    loop {
        let before = last_processed.as_ref().map(|message| message.id);
        let batch = thread_id
            .messages(http, |retriever| {
                if let Some(before) = before {
                    retriever.before(before);
                }
                retriever.limit(BATCH_SIZE)
            })
            .await?;

        for message in &batch {
            tally.add(&message.author.name, &message.content);
        }
        let Some(oldest) = batch.last().cloned() else {
            return Ok((tally, last_processed));
        };

        total += batch.len();
        debug!("Counted {total} messages in thread {thread_id}");
        last_processed = Some(oldest);
        responder
            .update(ReplyMessage::new(format!(
                "Processing.\nProcessed {total} messages so far."
            )))
            .await?;
        tokio::time::sleep(BATCH_PAUSE).await;
    }
}
