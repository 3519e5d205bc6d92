//! # Command System
//!
//! Hierarchical command tree for Discord interactions: loading, handler
//! resolution, guild registration and help rendering.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Commands live in a tree of groups; one dispatcher routes every interaction kind
//! - 2.1.0: Add modular handler infrastructure (handler trait, context, registry)
//! - 2.0.0: Remove bang commands, slash-only command system
//! - 1.0.0: Initial reorganization with modular command structure

pub mod context;
pub mod definition;
pub mod descriptors;
pub mod dispatch;
pub mod handler;
pub mod handlers;
pub mod help;
pub mod loader;
pub mod registry;
pub mod reply;
pub mod resolver;
pub mod slash;
pub mod tree;

pub use context::CommandContext;
pub use definition::{
    create_command, create_context_menu, create_moderator_command, Command, MenuCommand,
    SlashAction, SlashCommand, SubHandler,
};
pub use dispatch::Dispatcher;
pub use handler::{
    AutocompleteChoice, AutocompleteHandler, Describe, Handler, HandlerParams, InputStyle,
    ModalBuilder, ModalForm, ModalInput,
};
pub use handlers::registration_table;
pub use loader::{load_tree, ModuleSource, SourceEntry};
pub use registry::RegistrationTable;
pub use reply::{CommandReply, ReplyMessage, Responder};
pub use slash::{
    create_guild_commands, focused_option_value, get_channel_option, get_string_option,
    register_guild_commands,
};
pub use tree::{CommandTree, NamedEntry, TreeEntry};
