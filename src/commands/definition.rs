//! Command definitions
//!
//! A [`Command`] is either a slash command, invoked by typing, or a menu
//! command, invoked from a message context menu. Slash commands may
//! carry the sub-handlers for the buttons, selects and modals they produce.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::id::GuildId;
use serenity::model::Permissions;

use super::handler::{AutocompleteHandler, Describe, DescribeFn, Handler, ModalBuilder};

/// Handler for slash and context menu invocations
pub type CommandHandlerRef = Arc<dyn Handler<ApplicationCommandInteraction>>;

/// A handler reachable through a custom id declared by its owning slash command
pub struct SubHandler<I> {
    pub name: String,
    pub handler: Arc<dyn Handler<I>>,
}

impl<I> SubHandler<I> {
    pub fn new(name: impl Into<String>, handler: impl Handler<I> + 'static) -> Self {
        Self {
            name: name.into(),
            handler: Arc::new(handler),
        }
    }
}

impl<I> Clone for SubHandler<I> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<I> fmt::Debug for SubHandler<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubHandler").field("name", &self.name).finish()
    }
}

/// What selecting a slash command does
#[derive(Clone)]
pub enum SlashAction {
    /// Run the primary handler
    Run(CommandHandlerRef),
    /// Show a modal form whose submission goes to `submit`
    ShowModal {
        builder: Arc<dyn ModalBuilder>,
        submit: SubHandler<ModalSubmitInteraction>,
    },
}

#[derive(Clone)]
pub struct SlashCommand {
    help_text: String,
    describe: Arc<dyn Describe>,
    action: SlashAction,
    autocomplete: Option<Arc<dyn AutocompleteHandler>>,
    buttons: Vec<SubHandler<MessageComponentInteraction>>,
    string_selects: Vec<SubHandler<MessageComponentInteraction>>,
    role_selects: Vec<SubHandler<MessageComponentInteraction>>,
    modals: Vec<SubHandler<ModalSubmitInteraction>>,
}

impl SlashCommand {
    fn with_action(action: SlashAction) -> Self {
        Self {
            help_text: String::new(),
            describe: Arc::new(DescribeFn(|_: &mut CreateApplicationCommand, _: GuildId| {})),
            action,
            autocomplete: None,
            buttons: Vec::new(),
            string_selects: Vec::new(),
            role_selects: Vec::new(),
            modals: Vec::new(),
        }
    }

    /// A command that runs `handler` when invoked
    pub fn new(handler: impl Handler<ApplicationCommandInteraction> + 'static) -> Self {
        Self::with_action(SlashAction::Run(Arc::new(handler)))
    }

    /// A command that answers with a modal form handled by `submit`
    pub fn modal(
        builder: impl ModalBuilder + 'static,
        submit: SubHandler<ModalSubmitInteraction>,
    ) -> Self {
        Self::with_action(SlashAction::ShowModal {
            builder: Arc::new(builder),
            submit,
        })
    }

    /// Customise the descriptor with a synchronous builder closure
    pub fn describe_with<F>(self, describe: F) -> Self
    where
        F: Fn(&mut CreateApplicationCommand, GuildId) + Send + Sync + 'static,
    {
        self.describe_async(DescribeFn(describe))
    }

    pub fn describe_async(mut self, describe: impl Describe + 'static) -> Self {
        self.describe = Arc::new(describe);
        self
    }

    pub fn autocomplete(mut self, handler: impl AutocompleteHandler + 'static) -> Self {
        self.autocomplete = Some(Arc::new(handler));
        self
    }

    pub fn buttons(mut self, handlers: Vec<SubHandler<MessageComponentInteraction>>) -> Self {
        self.buttons.extend(handlers);
        self
    }

    pub fn string_selects(mut self, handlers: Vec<SubHandler<MessageComponentInteraction>>) -> Self {
        self.string_selects.extend(handlers);
        self
    }

    pub fn role_selects(mut self, handlers: Vec<SubHandler<MessageComponentInteraction>>) -> Self {
        self.role_selects.extend(handlers);
        self
    }

    pub fn modals(mut self, handlers: Vec<SubHandler<ModalSubmitInteraction>>) -> Self {
        self.modals.extend(handlers);
        self
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn describer(&self) -> &dyn Describe {
        self.describe.as_ref()
    }

    pub fn action(&self) -> &SlashAction {
        &self.action
    }

    pub fn autocomplete_handler(&self) -> Option<&Arc<dyn AutocompleteHandler>> {
        self.autocomplete.as_ref()
    }

    pub fn button_handlers(&self) -> &[SubHandler<MessageComponentInteraction>] {
        &self.buttons
    }

    pub fn string_select_handlers(&self) -> &[SubHandler<MessageComponentInteraction>] {
        &self.string_selects
    }

    pub fn role_select_handlers(&self) -> &[SubHandler<MessageComponentInteraction>] {
        &self.role_selects
    }

    /// Modal submit handlers, starting with the form submit of a modal command
    pub fn modal_handlers(&self) -> impl Iterator<Item = &SubHandler<ModalSubmitInteraction>> {
        let form_submit = match &self.action {
            SlashAction::ShowModal { submit, .. } => Some(submit),
            SlashAction::Run(_) => None,
        };
        form_submit.into_iter().chain(self.modals.iter())
    }
}

impl fmt::Debug for SlashCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match &self.action {
            SlashAction::Run(_) => "run",
            SlashAction::ShowModal { .. } => "show_modal",
        };
        f.debug_struct("SlashCommand")
            .field("help_text", &self.help_text)
            .field("action", &action)
            .field("autocomplete", &self.autocomplete.is_some())
            .field("buttons", &self.buttons)
            .field("string_selects", &self.string_selects)
            .field("role_selects", &self.role_selects)
            .field("modals", &self.modals)
            .finish()
    }
}

#[derive(Clone)]
pub struct MenuCommand {
    describe: Arc<dyn Describe>,
    handler: CommandHandlerRef,
}

impl MenuCommand {
    /// A context menu entry on messages
    pub fn on_message(handler: impl Handler<ApplicationCommandInteraction> + 'static) -> Self {
        Self {
            describe: Arc::new(DescribeFn(
                |cmd: &mut CreateApplicationCommand, _: GuildId| {
                    cmd.kind(CommandType::Message);
                },
            )),
            handler: Arc::new(handler),
        }
    }

    pub fn describer(&self) -> &dyn Describe {
        self.describe.as_ref()
    }

    pub fn handler(&self) -> &CommandHandlerRef {
        &self.handler
    }
}

impl fmt::Debug for MenuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuCommand").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Slash(SlashCommand),
    Menu(MenuCommand),
}

impl Command {
    pub fn as_slash(&self) -> Option<&SlashCommand> {
        match self {
            Command::Slash(slash) => Some(slash),
            Command::Menu(_) => None,
        }
    }

    pub fn as_menu(&self) -> Option<&MenuCommand> {
        match self {
            Command::Menu(menu) => Some(menu),
            Command::Slash(_) => None,
        }
    }
}

pub fn create_command(help_text: impl Into<String>, mut slash_command: SlashCommand) -> Command {
    slash_command.help_text = help_text.into();
    Command::Slash(slash_command)
}

pub fn create_context_menu(context_menu: MenuCommand) -> Command {
    Command::Menu(context_menu)
}

/// A slash command hidden from members who cannot ban by default
pub fn create_moderator_command(
    help_text: impl Into<String>,
    mut slash_command: SlashCommand,
) -> Command {
    slash_command.describe = Arc::new(WithDefaultPermissions {
        permissions: Permissions::BAN_MEMBERS,
        inner: slash_command.describe,
    });
    create_command(help_text, slash_command)
}

struct WithDefaultPermissions {
    permissions: Permissions,
    inner: Arc<dyn Describe>,
}

#[async_trait]
impl Describe for WithDefaultPermissions {
    async fn describe(
        &self,
        mut builder: CreateApplicationCommand,
        scope: GuildId,
    ) -> Result<CreateApplicationCommand> {
        builder.default_member_permissions(self.permissions);
        self.inner.describe(builder, scope).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::commands::handler::{HandlerParams, ModalForm};
    use crate::commands::reply::CommandReply;
    use crate::commands::CommandContext;

    /// Handler that answers with a fixed text
    pub(crate) struct Reply(pub &'static str);

    #[async_trait]
    impl<I: Sync> Handler<I> for Reply {
        async fn handle(&self, _params: HandlerParams<'_, I>) -> Result<CommandReply> {
            Ok(self.0.into())
        }
    }

    pub(crate) struct EmptyForm;

    #[async_trait]
    impl ModalBuilder for EmptyForm {
        async fn build(
            &self,
            form: ModalForm,
            _context: &CommandContext,
            _interaction: &ApplicationCommandInteraction,
        ) -> Result<ModalForm> {
            Ok(form.title("Form"))
        }
    }

    #[test]
    fn test_create_command_sets_help_text() {
        let command = create_command("rolls dice", SlashCommand::new(Reply("ok")));
        let slash = command.as_slash().unwrap();
        assert_eq!(slash.help_text(), "rolls dice");
        assert!(matches!(slash.action(), SlashAction::Run(_)));
        assert!(command.as_menu().is_none());
    }

    #[test]
    fn test_modal_command_lists_form_submit_first() {
        let slash = SlashCommand::modal(EmptyForm, SubHandler::new("form_submit", Reply("ok")))
            .modals(vec![SubHandler::new("other_modal", Reply("ok"))]);

        let names: Vec<&str> = slash.modal_handlers().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["form_submit", "other_modal"]);
    }

    #[test]
    fn test_run_command_has_no_form_submit() {
        let slash = SlashCommand::new(Reply("ok"));
        assert_eq!(slash.modal_handlers().count(), 0);
    }

    #[test]
    fn test_sub_handler_lists_keep_order() {
        let slash = SlashCommand::new(Reply("ok"))
            .buttons(vec![
                SubHandler::new("b1", Reply("1")),
                SubHandler::new("b2", Reply("2")),
            ])
            .string_selects(vec![SubHandler::new("s1", Reply("s"))])
            .role_selects(vec![SubHandler::new("r1", Reply("r"))]);

        let buttons: Vec<&str> = slash
            .button_handlers()
            .iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(buttons, vec!["b1", "b2"]);
        assert_eq!(slash.string_select_handlers()[0].name, "s1");
        assert_eq!(slash.role_select_handlers()[0].name, "r1");
    }

    #[tokio::test]
    async fn test_moderator_command_sets_default_permissions() {
        let command = create_moderator_command(
            "bans people",
            SlashCommand::new(Reply("ok")).describe_with(|cmd, _| {
                cmd.description("overridden");
            }),
        );
        let slash = command.as_slash().unwrap();
        let built = slash
            .describer()
            .describe(CreateApplicationCommand::default(), GuildId(1))
            .await
            .unwrap();

        assert!(built.0.contains_key("default_member_permissions"));
        assert_eq!(
            built.0.get("description").and_then(|v| v.as_str()),
            Some("overridden")
        );
    }

    #[tokio::test]
    async fn test_menu_command_sets_kind() {
        let menu = MenuCommand::on_message(Reply("ok"));
        let built = menu
            .describer()
            .describe(CreateApplicationCommand::default(), GuildId(1))
            .await
            .unwrap();
        assert_eq!(built.0.get("type").and_then(|v| v.as_u64()), Some(3));
    }
}
