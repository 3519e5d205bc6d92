//! Bundled command implementations
//!
//! - **Version**: 3.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 3.0.0: Commands are registered by tree path instead of by handler list
//! - 1.0.0: Initial extraction from monolithic command_handler.rs

pub mod dnd;
pub mod words;

use super::registry::RegistrationTable;

/// Every bundled command, keyed by its path in the command tree
///
/// Registration order is sibling order in the loaded tree, which is also the
/// order commands are registered with Discord.
pub fn registration_table() -> RegistrationTable {
    RegistrationTable::new()
        .with("dnd/roll", dnd::roll::command())
        .with("test/test", test::command())
        .with("words/count", words::count::command())
        .with("words/count words", words::message::command())
}
