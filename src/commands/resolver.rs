//! # Dispatch Resolver
//!
//! Maps an incoming identifier to the handler that owns it. Every category
//! walks the tree in the same pre-order; the first entry that yields a handler
//! wins. Lookups are not cached.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::sync::Arc;

use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;

use super::definition::{Command, CommandHandlerRef, SlashCommand, SubHandler};
use super::handler::{AutocompleteHandler, Handler};
use super::tree::{CommandTree, NamedEntry};

/// Slash and menu commands match their name exactly or case-insensitively
fn matches_command_name(entry: &NamedEntry, id: &str) -> bool {
    entry.name == id || entry.name.to_lowercase() == id
}

/// Any command registered under `id`
pub fn find_command<'a>(id: &str, tree: &'a CommandTree) -> Option<&'a Command> {
    tree.find_with(|entry| matches_command_name(entry, id))
}

/// Handler of the context menu command named exactly `id`
pub fn find_context_menu_handler(id: &str, tree: &CommandTree) -> Option<CommandHandlerRef> {
    tree.find_map(&mut |entry| match &entry.command {
        Command::Menu(menu) if entry.name == id => Some(Arc::clone(menu.handler())),
        _ => None,
    })
}

/// Autocomplete handler of the slash command named `id`
pub fn find_autocomplete_handler(
    id: &str,
    tree: &CommandTree,
) -> Option<Arc<dyn AutocompleteHandler>> {
    tree.find_map(&mut |entry| {
        if !matches_command_name(entry, id) {
            return None;
        }
        entry
            .command
            .as_slash()
            .and_then(|slash| slash.autocomplete_handler())
            .cloned()
    })
}

/// A family of sub-handlers a slash command can declare
///
/// Implemented by uninhabited tag types, one per category, so a single lookup
/// serves every category.
pub trait SubHandlerKind {
    type Interaction: 'static;

    fn handlers(command: &SlashCommand) -> Box<dyn Iterator<Item = &SubHandler<Self::Interaction>> + '_>;
}

pub enum Button {}
pub enum StringSelect {}
pub enum RoleSelect {}
pub enum ModalSubmit {}

impl SubHandlerKind for Button {
    type Interaction = MessageComponentInteraction;

    fn handlers(command: &SlashCommand) -> Box<dyn Iterator<Item = &SubHandler<Self::Interaction>> + '_> {
        Box::new(command.button_handlers().iter())
    }
}

impl SubHandlerKind for StringSelect {
    type Interaction = MessageComponentInteraction;

    fn handlers(command: &SlashCommand) -> Box<dyn Iterator<Item = &SubHandler<Self::Interaction>> + '_> {
        Box::new(command.string_select_handlers().iter())
    }
}

impl SubHandlerKind for RoleSelect {
    type Interaction = MessageComponentInteraction;

    fn handlers(command: &SlashCommand) -> Box<dyn Iterator<Item = &SubHandler<Self::Interaction>> + '_> {
        Box::new(command.role_select_handlers().iter())
    }
}

impl SubHandlerKind for ModalSubmit {
    type Interaction = ModalSubmitInteraction;

    fn handlers(command: &SlashCommand) -> Box<dyn Iterator<Item = &SubHandler<Self::Interaction>> + '_> {
        Box::new(command.modal_handlers())
    }
}

/// First sub-handler of category `K` whose custom id equals `id` exactly
pub fn find_sub_handler<K: SubHandlerKind>(
    id: &str,
    tree: &CommandTree,
) -> Option<Arc<dyn Handler<K::Interaction>>> {
    tree.find_map(&mut |entry| {
        let slash = entry.command.as_slash()?;
        K::handlers(slash)
            .find(|sub| sub.name == id)
            .map(|sub| Arc::clone(&sub.handler))
    })
}

pub fn find_button_handler(
    id: &str,
    tree: &CommandTree,
) -> Option<Arc<dyn Handler<MessageComponentInteraction>>> {
    find_sub_handler::<Button>(id, tree)
}

pub fn find_string_select_handler(
    id: &str,
    tree: &CommandTree,
) -> Option<Arc<dyn Handler<MessageComponentInteraction>>> {
    find_sub_handler::<StringSelect>(id, tree)
}

pub fn find_role_select_handler(
    id: &str,
    tree: &CommandTree,
) -> Option<Arc<dyn Handler<MessageComponentInteraction>>> {
    find_sub_handler::<RoleSelect>(id, tree)
}

pub fn find_modal_handler(
    id: &str,
    tree: &CommandTree,
) -> Option<Arc<dyn Handler<ModalSubmitInteraction>>> {
    find_sub_handler::<ModalSubmit>(id, tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::definition::tests::{EmptyForm, Reply};
    use crate::commands::definition::{create_command, create_context_menu, MenuCommand};
    use crate::commands::handler::AutocompleteChoice;
    use crate::commands::CommandContext;
    use anyhow::Result;
    use async_trait::async_trait;
    use serenity::model::application::interaction::autocomplete::AutocompleteInteraction;

    struct NoChoices;

    #[async_trait]
    impl AutocompleteHandler for NoChoices {
        async fn complete(
            &self,
            _context: &CommandContext,
            _interaction: &AutocompleteInteraction,
        ) -> Result<Vec<AutocompleteChoice>> {
            Ok(Vec::new())
        }
    }

    fn slash(help: &str) -> Command {
        create_command(help, SlashCommand::new(Reply("ok")))
    }

    fn sample() -> CommandTree {
        CommandTree::root()
            .with_command("ping", slash("ping"))
            .with_command("Shout", slash("shout"))
            .with_command("count words", create_context_menu(MenuCommand::on_message(Reply("menu"))))
            .with_group(
                CommandTree::new("g1").with_command(
                    "poll",
                    create_command(
                        "first poll",
                        SlashCommand::new(Reply("ok"))
                            .autocomplete(NoChoices)
                            .buttons(vec![SubHandler::new("vote", Reply("g1 vote"))])
                            .string_selects(vec![SubHandler::new("choice", Reply("select"))]),
                    ),
                ),
            )
            .with_group(
                CommandTree::new("g2")
                    .with_command(
                        "poll",
                        create_command(
                            "second poll",
                            SlashCommand::new(Reply("ok"))
                                .buttons(vec![SubHandler::new("vote", Reply("g2 vote"))])
                                .role_selects(vec![SubHandler::new("roles", Reply("roles"))]),
                        ),
                    )
                    .with_command(
                        "feedback",
                        create_command(
                            "form",
                            SlashCommand::modal(EmptyForm, SubHandler::new("feedback_submit", Reply("thanks")))
                                .modals(vec![SubHandler::new("followup_form", Reply("more"))]),
                        ),
                    ),
            )
    }

    #[test]
    fn test_find_command_exact_and_lowercase() {
        let tree = sample();
        assert!(find_command("ping", &tree).is_some());
        assert!(find_command("shout", &tree).is_some());
        assert!(find_command("Shout", &tree).is_some());
        assert!(find_command("PING", &tree).is_none());
        assert!(find_command("missing", &tree).is_none());
    }

    #[test]
    fn test_first_group_wins_for_duplicate_names() {
        let tree = sample();
        let poll = find_command("poll", &tree).unwrap();
        assert_eq!(poll.as_slash().unwrap().help_text(), "first poll");

        let first = find_button_handler("vote", &tree).unwrap();
        let again = find_button_handler("vote", &tree).unwrap();
        let g1_vote = tree
            .groups()
            .next()
            .and_then(|g1| g1.commands().next())
            .and_then(|entry| entry.command.as_slash())
            .map(|slash| Arc::clone(&slash.button_handlers()[0].handler))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert!(Arc::ptr_eq(&first, &g1_vote));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let tree = sample();
        let a = find_context_menu_handler("count words", &tree).unwrap();
        let b = find_context_menu_handler("count words", &tree).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let a = find_modal_handler("feedback_submit", &tree).unwrap();
        let b = find_modal_handler("feedback_submit", &tree).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_context_menu_and_slash_are_isolated() {
        let tree = sample();
        assert!(find_context_menu_handler("ping", &tree).is_none());
        assert!(find_context_menu_handler("Count Words", &tree).is_none());
        assert!(find_autocomplete_handler("count words", &tree).is_none());
        assert!(find_sub_handler::<Button>("count words", &tree).is_none());
    }

    #[test]
    fn test_sub_handler_categories_are_isolated() {
        let tree = sample();
        assert!(find_string_select_handler("choice", &tree).is_some());
        assert!(find_button_handler("choice", &tree).is_none());
        assert!(find_role_select_handler("roles", &tree).is_some());
        assert!(find_string_select_handler("roles", &tree).is_none());
        assert!(find_modal_handler("vote", &tree).is_none());
    }

    #[test]
    fn test_sub_handler_ids_are_case_sensitive() {
        let tree = sample();
        assert!(find_button_handler("Vote", &tree).is_none());
    }

    #[test]
    fn test_modal_lookup_covers_form_submit_and_extra_modals() {
        let tree = sample();
        assert!(find_modal_handler("feedback_submit", &tree).is_some());
        assert!(find_modal_handler("followup_form", &tree).is_some());
    }

    #[test]
    fn test_autocomplete_requires_declared_handler() {
        let tree = sample();
        assert!(find_autocomplete_handler("poll", &tree).is_some());
        assert!(find_autocomplete_handler("ping", &tree).is_none());
    }
}
