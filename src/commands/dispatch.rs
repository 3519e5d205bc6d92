//! # Interaction Dispatcher
//!
//! Per-event boundary between the gateway and command handlers: resolves the
//! handler for each interaction, runs it, delivers its reply, and turns
//! misses and failures into replies of their own.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Handlers run on the gateway client's `Http`; routing split into pure lookups
//! - 1.0.0: Initial dispatcher

use std::sync::Arc;

use anyhow::{Context as _, Result};
use log::{debug, error, info, warn};
use serenity::http::Http;
use serenity::model::application::command::CommandType;
use serenity::model::application::component::{ComponentType, InputTextStyle};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use uuid::Uuid;

use super::context::CommandContext;
use super::definition::{Command, SlashAction};
use super::handler::{Handler, HandlerParams, InputStyle, ModalForm};
use super::help::get_help_text;
use super::reply::{ReplyChannel, ReplyMessage, Responder};
use super::resolver::{
    find_autocomplete_handler, find_button_handler, find_command, find_context_menu_handler,
    find_modal_handler, find_role_select_handler, find_string_select_handler,
};
use super::slash::{get_string_option, HELP_COMMAND, HELP_SEARCH_OPTION};
use super::tree::CommandTree;
use crate::core::truncate_for_message;

/// Reply for a component, modal or context menu id nothing handles
pub fn missing_handler_message(id: &str) -> ReplyMessage {
    ReplyMessage::ephemeral(format!(
        "Could not find handler for this action. Handler={id}"
    ))
}

/// Reply for a slash command name nothing handles
pub fn missing_command_message(id: &str) -> ReplyMessage {
    ReplyMessage::new(format!(
        "Failed finding command to run. Command trying to run: {id}"
    ))
}

/// Reply for a handler that returned an error
pub fn failure_message(error: &anyhow::Error) -> ReplyMessage {
    ReplyMessage::new(truncate_for_message(&format!(
        "Something has gone wrong.\nError:\n {error:#}"
    )))
}

/// What a slash command name routes to
pub enum SlashRoute<'a> {
    /// The built-in `/help`
    Help,
    /// A slash command in the tree
    Action(&'a SlashAction),
    /// Nothing in the tree answers to the name
    Missing,
}

/// Route a chat input command name; `/help` wins over any tree entry
pub fn route_slash<'a>(name: &str, tree: &'a CommandTree) -> SlashRoute<'a> {
    if name == HELP_COMMAND {
        return SlashRoute::Help;
    }
    match find_command(name, tree) {
        Some(Command::Slash(slash)) => SlashRoute::Action(slash.action()),
        _ => SlashRoute::Missing,
    }
}

/// Handler for a component, looked up in the category of its kind
///
/// serenity 0.11 has no role select kind, so anything other than a button or
/// a string select is looked up as a role select.
pub fn find_component_handler(
    kind: ComponentType,
    id: &str,
    tree: &CommandTree,
) -> Option<Arc<dyn Handler<MessageComponentInteraction>>> {
    match kind {
        ComponentType::Button => find_button_handler(id, tree),
        ComponentType::SelectMenu => find_string_select_handler(id, tree),
        _ => find_role_select_handler(id, tree),
    }
}

/// Routes every interaction against one loaded command tree
#[derive(Clone)]
pub struct Dispatcher {
    tree: Arc<CommandTree>,
    help_intro: String,
}

impl Dispatcher {
    pub fn new(tree: Arc<CommandTree>, help_intro: impl Into<String>) -> Self {
        Self {
            tree,
            help_intro: help_intro.into(),
        }
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// Handler context for one event
    ///
    /// `http` must be the gateway client's handle. Only that one learns the
    /// application id, which deferred edits and follow-ups need.
    pub fn context_for(&self, http: Arc<Http>) -> CommandContext {
        CommandContext::new(http, self.help_intro.clone())
    }

    /// Handle one interaction; nothing escapes this call
    pub async fn dispatch(&self, http: Arc<Http>, interaction: Interaction) {
        let request_id = Uuid::new_v4();
        let context = self.context_for(http);
        match interaction {
            Interaction::ApplicationCommand(command) => {
                self.on_application_command(&context, &command, request_id)
                    .await
            }
            Interaction::MessageComponent(component) => {
                self.on_component(&context, &component, request_id).await
            }
            Interaction::ModalSubmit(modal) => {
                self.on_modal_submit(&context, &modal, request_id).await
            }
            Interaction::Autocomplete(autocomplete) => {
                self.on_autocomplete(&context, &autocomplete, request_id)
                    .await
            }
            _ => debug!("[{request_id}] Ignoring interaction without a command route"),
        }
    }

    async fn on_application_command(
        &self,
        context: &CommandContext,
        interaction: &ApplicationCommandInteraction,
        request_id: Uuid,
    ) {
        let name = interaction.data.name.as_str();
        info!(
            "[{}] 📥 Command '{}' from user {}",
            request_id, name, interaction.user.id
        );
        let responder = Responder::new(interaction, &context.http);

        if interaction.data.kind != CommandType::ChatInput {
            let handler = find_context_menu_handler(name, &self.tree);
            find_and_run(handler, name, context, &responder, request_id).await;
            return;
        }

        let outcome = self
            .run_slash(context, interaction, &responder, request_id)
            .await;
        report_if_failed(outcome, &responder, request_id).await;
    }

    async fn run_slash(
        &self,
        context: &CommandContext,
        interaction: &ApplicationCommandInteraction,
        responder: &Responder<'_, ApplicationCommandInteraction>,
        request_id: Uuid,
    ) -> Result<()> {
        let name = interaction.data.name.as_str();

        match route_slash(name, &self.tree) {
            SlashRoute::Help => {
                let search = get_string_option(&interaction.data.options, HELP_SEARCH_OPTION);
                let text = get_help_text(&context.help_intro, &self.tree, search.as_deref());
                responder
                    .send(ReplyMessage::ephemeral(truncate_for_message(&text)).into())
                    .await?;
            }
            SlashRoute::Missing => {
                warn!("[{request_id}] ❓ No slash command named '{name}'");
                responder.send(missing_command_message(name).into()).await?;
            }
            SlashRoute::Action(SlashAction::Run(handler)) => {
                run_handler(handler.as_ref(), context, responder, request_id).await;
            }
            SlashRoute::Action(SlashAction::ShowModal { builder, submit }) => {
                let form = ModalForm::new(submit.name.clone());
                let form = builder.build(form, context, interaction).await?;
                debug!("[{request_id}] Showing modal '{}'", form.custom_id);
                show_modal(interaction, context, &form).await?;
                responder.mark_replied().await;
            }
        }
        Ok(())
    }

    async fn on_component(
        &self,
        context: &CommandContext,
        interaction: &MessageComponentInteraction,
        request_id: Uuid,
    ) {
        let id = interaction.data.custom_id.as_str();
        debug!(
            "[{}] 📥 Component '{}' ({:?})",
            request_id, id, interaction.data.component_type
        );
        let handler = find_component_handler(interaction.data.component_type, id, &self.tree);
        let responder = Responder::new(interaction, &context.http);
        find_and_run(handler, id, context, &responder, request_id).await;
    }

    async fn on_modal_submit(
        &self,
        context: &CommandContext,
        interaction: &ModalSubmitInteraction,
        request_id: Uuid,
    ) {
        let id = interaction.data.custom_id.as_str();
        debug!("[{request_id}] 📥 Modal submit '{id}'");
        let handler = find_modal_handler(id, &self.tree);
        let responder = Responder::new(interaction, &context.http);
        find_and_run(handler, id, context, &responder, request_id).await;
    }

    async fn on_autocomplete(
        &self,
        context: &CommandContext,
        interaction: &AutocompleteInteraction,
        request_id: Uuid,
    ) {
        let name = interaction.data.name.as_str();
        let Some(handler) = find_autocomplete_handler(name, &self.tree) else {
            info!("[{request_id}] Tried to get autocomplete for '{name}' which has no autocompletion");
            return;
        };

        let outcome = async {
            let choices = handler.complete(context, interaction).await?;
            interaction
                .create_autocomplete_response(&context.http, |response| {
                    for choice in &choices {
                        response.add_string_choice(&choice.name, &choice.value);
                    }
                    response
                })
                .await
                .context("sending autocomplete choices")?;
            anyhow::Ok(())
        }
        .await;

        if let Err(e) = outcome {
            error!("[{request_id}] ❌ Autocomplete for '{name}' failed: {e:#}");
        }
    }
}

/// Run `handler` if one was found, otherwise tell the user nothing handles `id`
pub async fn find_and_run<I>(
    handler: Option<Arc<dyn Handler<I>>>,
    id: &str,
    context: &CommandContext,
    responder: &Responder<'_, I>,
    request_id: Uuid,
) where
    I: ReplyChannel,
{
    match handler {
        Some(handler) => run_handler(handler.as_ref(), context, responder, request_id).await,
        None => {
            warn!("[{request_id}] ❓ No handler for '{id}'");
            let outcome = responder
                .send(missing_handler_message(id).into())
                .await
                .map(|_| ());
            report_if_failed(outcome, responder, request_id).await;
        }
    }
}

/// Run a handler and deliver its reply; failures become a failure reply
pub async fn run_handler<I>(
    handler: &dyn Handler<I>,
    context: &CommandContext,
    responder: &Responder<'_, I>,
    request_id: Uuid,
) where
    I: ReplyChannel,
{
    let params = HandlerParams {
        context,
        interaction: responder.channel(),
        responder,
    };
    let outcome = match handler.handle(params).await {
        Ok(reply) => responder.send(reply).await.map(|_| ()),
        Err(e) => Err(e),
    };
    report_if_failed(outcome, responder, request_id).await;
}

/// Log a failure and, when the interaction still accepts replies, report it there
pub async fn report_if_failed<I>(outcome: Result<()>, responder: &Responder<'_, I>, request_id: Uuid)
where
    I: ReplyChannel,
{
    let Err(e) = outcome else {
        return;
    };
    error!("[{request_id}] ❌ Handler failed: {e:#}");

    if !responder.is_repliable() {
        return;
    }
    match responder.send(failure_message(&e).into()).await {
        Ok(true) => {}
        Ok(false) | Err(_) => warn!("[{request_id}] Could not report the failure in chat"),
    }
}

async fn show_modal(
    interaction: &ApplicationCommandInteraction,
    context: &CommandContext,
    form: &ModalForm,
) -> Result<()> {
    interaction
        .create_interaction_response(&context.http, |response| {
            response
                .kind(InteractionResponseType::Modal)
                .interaction_response_data(|modal| {
                    modal
                        .custom_id(&form.custom_id)
                        .title(&form.title)
                        .components(|components| {
                            for input in &form.inputs {
                                components.create_action_row(|row| {
                                    row.create_input_text(|text| {
                                        text.custom_id(&input.custom_id)
                                            .label(&input.label)
                                            .style(input_text_style(input.style))
                                            .required(input.required);
                                        if let Some(placeholder) = &input.placeholder {
                                            text.placeholder(placeholder);
                                        }
                                        text
                                    })
                                });
                            }
                            components
                        })
                })
        })
        .await
        .context("showing modal form")?;
    Ok(())
}

fn input_text_style(style: InputStyle) -> InputTextStyle {
    match style {
        InputStyle::Short => InputTextStyle::Short,
        InputStyle::Paragraph => InputTextStyle::Paragraph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::reply::tests::{test_http, RecordingChannel};
    use crate::commands::definition::tests::{EmptyForm, Reply};
    use crate::commands::definition::{
        create_command, create_context_menu, MenuCommand, SlashCommand, SubHandler,
    };
    use crate::commands::reply::CommandReply;
    use anyhow::bail;
    use async_trait::async_trait;

    struct Fails;

    #[async_trait]
    impl Handler<RecordingChannel> for Fails {
        async fn handle(&self, _params: HandlerParams<'_, RecordingChannel>) -> Result<CommandReply> {
            bail!("dice bag is empty")
        }
    }

    struct DefersThenAnswers;

    #[async_trait]
    impl Handler<RecordingChannel> for DefersThenAnswers {
        async fn handle(&self, params: HandlerParams<'_, RecordingChannel>) -> Result<CommandReply> {
            params.responder.defer(false).await?;
            params
                .responder
                .update(ReplyMessage::new("Processing."))
                .await?;
            Ok("done".into())
        }
    }

    struct Answers(&'static str);

    #[async_trait]
    impl Handler<RecordingChannel> for Answers {
        async fn handle(&self, _params: HandlerParams<'_, RecordingChannel>) -> Result<CommandReply> {
            Ok(self.0.into())
        }
    }

    fn context() -> CommandContext {
        CommandContext::new(Arc::new(test_http()), "intro")
    }

    #[tokio::test]
    async fn test_found_handler_reply_is_sent() {
        let channel = RecordingChannel::default();
        let http = test_http();
        let responder = Responder::new(&channel, &http);
        let handler: Arc<dyn Handler<RecordingChannel>> = Arc::new(Answers("Amazing test!"));

        find_and_run(Some(handler), "test", &context(), &responder, Uuid::new_v4()).await;
        assert_eq!(channel.calls(), vec!["reply:false:Amazing test!"]);
    }

    #[tokio::test]
    async fn test_missing_handler_replies_ephemerally_with_id() {
        let channel = RecordingChannel::default();
        let http = test_http();
        let responder = Responder::new(&channel, &http);

        find_and_run(None, "vote_yes", &context(), &responder, Uuid::new_v4()).await;
        assert_eq!(
            channel.calls(),
            vec!["reply:true:Could not find handler for this action. Handler=vote_yes"]
        );
    }

    #[tokio::test]
    async fn test_handler_failure_is_reported() {
        let channel = RecordingChannel::default();
        let http = test_http();
        let responder = Responder::new(&channel, &http);

        run_handler(&Fails, &context(), &responder, Uuid::new_v4()).await;
        assert_eq!(
            channel.calls(),
            vec!["reply:false:Something has gone wrong.\nError:\n dice bag is empty"]
        );
    }

    #[tokio::test]
    async fn test_failure_on_closed_channel_is_only_logged() {
        let channel = RecordingChannel::closed();
        let http = test_http();
        let responder = Responder::new(&channel, &http);

        run_handler(&Fails, &context(), &responder, Uuid::new_v4()).await;
        assert!(channel.calls().is_empty());
    }

    #[tokio::test]
    async fn test_deferred_handler_reply_edits_original() {
        let channel = RecordingChannel::default();
        let http = test_http();
        let responder = Responder::new(&channel, &http);

        run_handler(&DefersThenAnswers, &context(), &responder, Uuid::new_v4()).await;
        assert_eq!(
            channel.calls(),
            vec!["defer:false", "edit:Processing.", "edit:done"]
        );
    }

    #[test]
    fn test_miss_messages() {
        assert_eq!(
            missing_command_message("roll").content,
            "Failed finding command to run. Command trying to run: roll"
        );
        assert!(!missing_command_message("roll").ephemeral);
        assert!(missing_handler_message("x").ephemeral);
    }

    #[test]
    fn test_failure_message_is_truncated() {
        let error = anyhow::anyhow!("{}", "x".repeat(5000));
        let message = failure_message(&error);
        assert!(message.content.chars().count() <= crate::core::MESSAGE_LIMIT);
        assert!(message.content.starts_with("Something has gone wrong."));
    }

    #[test]
    fn test_input_styles_map() {
        assert_eq!(input_text_style(InputStyle::Short), InputTextStyle::Short);
        assert_eq!(input_text_style(InputStyle::Paragraph), InputTextStyle::Paragraph);
    }

    fn routed_tree() -> CommandTree {
        CommandTree::root()
            .with_command("help", create_command("shadowed", SlashCommand::new(Reply("no"))))
            .with_command("ping", create_command("pong", SlashCommand::new(Reply("pong"))))
            .with_command(
                "feedback",
                create_command(
                    "opens a form",
                    SlashCommand::modal(EmptyForm, SubHandler::new("feedback_form", Reply("thanks"))),
                ),
            )
            .with_command(
                "count words",
                create_context_menu(MenuCommand::on_message(Reply("3"))),
            )
            .with_group(
                CommandTree::new("poll").with_command(
                    "poll",
                    create_command(
                        "runs a poll",
                        SlashCommand::new(Reply("poll"))
                            .buttons(vec![SubHandler::new("vote", Reply("voted"))])
                            .string_selects(vec![SubHandler::new("choice", Reply("chosen"))])
                            .role_selects(vec![SubHandler::new("roles", Reply("granted"))]),
                    ),
                ),
            )
    }

    #[test]
    fn test_help_is_routed_before_the_tree() {
        assert!(matches!(route_slash("help", &routed_tree()), SlashRoute::Help));
    }

    #[test]
    fn test_slash_routes() {
        let tree = routed_tree();
        assert!(matches!(
            route_slash("ping", &tree),
            SlashRoute::Action(SlashAction::Run(_))
        ));
        assert!(matches!(
            route_slash("poll", &tree),
            SlashRoute::Action(SlashAction::Run(_))
        ));
        match route_slash("feedback", &tree) {
            SlashRoute::Action(SlashAction::ShowModal { submit, .. }) => {
                assert_eq!(submit.name, "feedback_form")
            }
            _ => panic!("feedback should open its form"),
        }
    }

    #[test]
    fn test_unknown_and_menu_names_miss_as_slash() {
        let tree = routed_tree();
        assert!(matches!(route_slash("nope", &tree), SlashRoute::Missing));
        assert!(matches!(route_slash("count words", &tree), SlashRoute::Missing));
    }

    #[tokio::test]
    async fn test_slash_miss_reply_is_public() {
        let channel = RecordingChannel::default();
        let http = test_http();
        let responder = Responder::new(&channel, &http);

        responder
            .send(missing_command_message("nope").into())
            .await
            .unwrap();
        assert_eq!(
            channel.calls(),
            vec!["reply:false:Failed finding command to run. Command trying to run: nope"]
        );
    }

    #[test]
    fn test_component_kind_picks_category() {
        let tree = routed_tree();
        let found = |kind, id| find_component_handler(kind, id, &tree).is_some();

        assert!(found(ComponentType::Button, "vote"));
        assert!(!found(ComponentType::Button, "choice"));
        assert!(found(ComponentType::SelectMenu, "choice"));
        assert!(!found(ComponentType::SelectMenu, "roles"));
        assert!(found(ComponentType::Unknown, "roles"));
        assert!(!found(ComponentType::Unknown, "vote"));
    }

    #[test]
    fn test_event_context_uses_gateway_http() {
        let http = Arc::new(Http::new_with_application_id("token", 42));
        let dispatcher = Dispatcher::new(Arc::new(routed_tree()), "intro");

        let context = dispatcher.context_for(Arc::clone(&http));
        assert!(Arc::ptr_eq(&context.http, &http));
        assert_eq!(context.http.application_id(), Some(42));
        assert_eq!(context.help_intro, "intro");
    }
}
