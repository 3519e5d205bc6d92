//! Reply delivery for interactions
//!
//! An interaction accepts exactly one initial response. After that the
//! original response can be edited and further messages go out as follow-ups.
//! [`Responder`] tracks which of those modes is valid for an event and picks
//! the right one when a handler's [`CommandReply`] is delivered.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{bail, Result};
use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use tokio::sync::Mutex;

/// Message content plus delivery flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyMessage {
    pub content: String,
    pub ephemeral: bool,
}

impl ReplyMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// A message only the invoking user can see
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// What a handler asks the router to send back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommandReply {
    /// Nothing to send; the handler answered on its own or needs no answer
    #[default]
    Silent,
    Text(String),
    Message(ReplyMessage),
}

impl CommandReply {
    pub fn into_message(self) -> Option<ReplyMessage> {
        match self {
            CommandReply::Silent => None,
            CommandReply::Text(content) => Some(ReplyMessage::new(content)),
            CommandReply::Message(message) => Some(message),
        }
    }
}

impl From<&str> for CommandReply {
    fn from(text: &str) -> Self {
        CommandReply::Text(text.to_string())
    }
}

impl From<String> for CommandReply {
    fn from(text: String) -> Self {
        CommandReply::Text(text)
    }
}

impl From<ReplyMessage> for CommandReply {
    fn from(message: ReplyMessage) -> Self {
        CommandReply::Message(message)
    }
}

/// Where an interaction stands in its response lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyState {
    /// No response sent yet
    Fresh,
    /// Acknowledged with a deferred response that has not been filled in
    Deferred,
    /// The original response exists
    Replied,
}

/// The raw response operations of an interaction
#[async_trait]
pub trait ReplyChannel: Send + Sync {
    /// Whether the interaction can carry message responses at all
    fn is_repliable(&self) -> bool {
        true
    }

    async fn create_reply(&self, http: &Http, message: &ReplyMessage) -> Result<()>;

    async fn defer_reply(&self, http: &Http, ephemeral: bool) -> Result<()>;

    async fn edit_reply(&self, http: &Http, message: &ReplyMessage) -> Result<()>;

    async fn follow_up(&self, http: &Http, message: &ReplyMessage) -> Result<()>;
}

macro_rules! impl_reply_channel {
    ($($interaction:ty),+ $(,)?) => {$(
        #[async_trait]
        impl ReplyChannel for $interaction {
            async fn create_reply(&self, http: &Http, message: &ReplyMessage) -> Result<()> {
                self.create_interaction_response(http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|data| {
                            data.content(&message.content).ephemeral(message.ephemeral)
                        })
                })
                .await?;
                Ok(())
            }

            async fn defer_reply(&self, http: &Http, ephemeral: bool) -> Result<()> {
                self.create_interaction_response(http, |response| {
                    response
                        .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                        .interaction_response_data(|data| data.ephemeral(ephemeral))
                })
                .await?;
                Ok(())
            }

            async fn edit_reply(&self, http: &Http, message: &ReplyMessage) -> Result<()> {
                self.edit_original_interaction_response(http, |response| {
                    response.content(&message.content)
                })
                .await?;
                Ok(())
            }

            async fn follow_up(&self, http: &Http, message: &ReplyMessage) -> Result<()> {
                self.create_followup_message(http, |followup| {
                    followup.content(&message.content).ephemeral(message.ephemeral)
                })
                .await?;
                Ok(())
            }
        }
    )+};
}

impl_reply_channel!(
    ApplicationCommandInteraction,
    MessageComponentInteraction,
    ModalSubmitInteraction,
);

#[async_trait]
impl ReplyChannel for AutocompleteInteraction {
    fn is_repliable(&self) -> bool {
        false
    }

    async fn create_reply(&self, _http: &Http, _message: &ReplyMessage) -> Result<()> {
        bail!("autocomplete interactions cannot carry message replies")
    }

    async fn defer_reply(&self, _http: &Http, _ephemeral: bool) -> Result<()> {
        bail!("autocomplete interactions cannot be deferred")
    }

    async fn edit_reply(&self, _http: &Http, _message: &ReplyMessage) -> Result<()> {
        bail!("autocomplete interactions cannot carry message replies")
    }

    async fn follow_up(&self, _http: &Http, _message: &ReplyMessage) -> Result<()> {
        bail!("autocomplete interactions cannot carry message replies")
    }
}

/// Stateful reply helper for a single interaction
///
/// The state lock is held across the API call so two replies racing on the
/// same interaction cannot both take the initial-response path.
pub struct Responder<'a, I> {
    channel: &'a I,
    http: &'a Http,
    state: Mutex<ReplyState>,
}

impl<'a, I: ReplyChannel> Responder<'a, I> {
    pub fn new(channel: &'a I, http: &'a Http) -> Self {
        Self {
            channel,
            http,
            state: Mutex::new(ReplyState::Fresh),
        }
    }

    pub fn channel(&self) -> &'a I {
        self.channel
    }

    pub fn is_repliable(&self) -> bool {
        self.channel.is_repliable()
    }

    pub async fn state(&self) -> ReplyState {
        *self.state.lock().await
    }

    /// Acknowledge now and answer later. No-op once any response exists.
    pub async fn defer(&self, ephemeral: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        if *state == ReplyState::Fresh {
            self.channel.defer_reply(self.http, ephemeral).await?;
            *state = ReplyState::Deferred;
        }
        Ok(())
    }

    /// Deliver a reply using whichever mode the interaction currently allows
    ///
    /// Returns whether anything was sent.
    pub async fn send(&self, reply: CommandReply) -> Result<bool> {
        let Some(message) = reply.into_message() else {
            return Ok(false);
        };
        if !self.channel.is_repliable() {
            return Ok(false);
        }

        let mut state = self.state.lock().await;
        match *state {
            ReplyState::Deferred => self.channel.edit_reply(self.http, &message).await?,
            ReplyState::Replied => self.channel.follow_up(self.http, &message).await?,
            ReplyState::Fresh => self.channel.create_reply(self.http, &message).await?,
        }
        *state = ReplyState::Replied;
        Ok(true)
    }

    /// Rewrite the original response in place, e.g. for progress updates
    ///
    /// A deferred interaction stays deferred, so the final [`send`](Self::send)
    /// still lands in the original response.
    pub async fn update(&self, message: ReplyMessage) -> Result<()> {
        let mut state = self.state.lock().await;
        match *state {
            ReplyState::Fresh => {
                self.channel.create_reply(self.http, &message).await?;
                *state = ReplyState::Replied;
            }
            ReplyState::Deferred | ReplyState::Replied => {
                self.channel.edit_reply(self.http, &message).await?;
            }
        }
        Ok(())
    }

    /// Record that the interaction was answered outside this helper
    pub(crate) async fn mark_replied(&self) {
        *self.state.lock().await = ReplyState::Replied;
    }
}
