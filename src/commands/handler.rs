//! Handler traits for every interaction category
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Generic `Handler<I>` over interaction kinds, descriptor and modal builders
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;
use serenity::model::id::GuildId;

use super::context::CommandContext;
use super::reply::{CommandReply, Responder};

/// Everything a handler receives for one invocation
pub struct HandlerParams<'a, I> {
    /// Shared, read-only services constructed at startup
    pub context: &'a CommandContext,
    pub interaction: &'a I,
    /// Reply helper for handlers that defer or send more than one message
    pub responder: &'a Responder<'a, I>,
}

/// Trait for interaction handlers
///
/// `I` is the interaction type the handler is invoked with: application
/// commands for slash and context menu commands, message components for
/// buttons and selects, modal submits for modals.
///
/// # Example
///
/// ```ignore
/// pub struct Ping;
///
/// #[async_trait]
/// impl Handler<ApplicationCommandInteraction> for Ping {
///     async fn handle(
///         &self,
///         _params: HandlerParams<'_, ApplicationCommandInteraction>,
///     ) -> Result<CommandReply> {
///         Ok("Pong!".into())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<I>: Send + Sync {
    /// Handle the interaction and return what should be sent back
    async fn handle(&self, params: HandlerParams<'_, I>) -> Result<CommandReply>;
}

/// One suggestion offered while the user types an option value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteChoice {
    pub name: String,
    pub value: String,
}

impl AutocompleteChoice {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[async_trait]
pub trait AutocompleteHandler: Send + Sync {
    async fn complete(
        &self,
        context: &CommandContext,
        interaction: &AutocompleteInteraction,
    ) -> Result<Vec<AutocompleteChoice>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStyle {
    Short,
    Paragraph,
}

/// A text input inside a modal form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalInput {
    pub custom_id: String,
    pub label: String,
    pub style: InputStyle,
    pub required: bool,
    pub placeholder: Option<String>,
}

impl ModalInput {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>, style: InputStyle) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: label.into(),
            style,
            required: true,
            placeholder: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// A modal form shown in response to a slash command
///
/// The router seeds `custom_id` with the name of the command's modal submit
/// handler so the submission routes back to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalForm {
    pub custom_id: String,
    pub title: String,
    pub inputs: Vec<ModalInput>,
}

impl ModalForm {
    pub fn new(custom_id: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            title: String::new(),
            inputs: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn input(mut self, input: ModalInput) -> Self {
        self.inputs.push(input);
        self
    }
}

#[async_trait]
pub trait ModalBuilder: Send + Sync {
    async fn build(
        &self,
        form: ModalForm,
        context: &CommandContext,
        interaction: &ApplicationCommandInteraction,
    ) -> Result<ModalForm>;
}

/// Produces the registration descriptor of a command for one scope
///
/// The builder arrives pre-seeded with the command name (and description for
/// slash commands).
#[async_trait]
pub trait Describe: Send + Sync {
    async fn describe(
        &self,
        builder: CreateApplicationCommand,
        scope: GuildId,
    ) -> Result<CreateApplicationCommand>;
}

/// Adapts a synchronous builder closure to [`Describe`]
pub struct DescribeFn<F>(pub F);

#[async_trait]
impl<F> Describe for DescribeFn<F>
where
    F: Fn(&mut CreateApplicationCommand, GuildId) + Send + Sync,
{
    async fn describe(
        &self,
        mut builder: CreateApplicationCommand,
        scope: GuildId,
    ) -> Result<CreateApplicationCommand> {
        (self.0)(&mut builder, scope);
        Ok(builder)
    }
}
