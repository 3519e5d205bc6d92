//! Registration descriptors for every command in the tree
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use serenity::builder::CreateApplicationCommand;
use serenity::model::id::GuildId;

use super::definition::Command;
use super::tree::{CommandTree, TreeEntry};

/// Collect one descriptor per leaf, in tree pre-order
///
/// Slash commands start from a builder carrying the lower-cased name and the
/// help text as description; menu commands start from the name alone. Each
/// command's describer then finishes its builder for `scope`.
pub fn collect_descriptors(
    tree: &CommandTree,
    scope: GuildId,
) -> BoxFuture<'_, Result<Vec<CreateApplicationCommand>>> {
    async move {
        let mut descriptors = Vec::new();
        for entry in &tree.entries {
            match entry {
                TreeEntry::Command(named) => {
                    let mut builder = CreateApplicationCommand::default();
                    builder.name(named.name.to_lowercase());
                    let descriptor = match &named.command {
                        Command::Slash(slash) => {
                            builder.description(slash.help_text());
                            slash.describer().describe(builder, scope).await?
                        }
                        Command::Menu(menu) => menu.describer().describe(builder, scope).await?,
                    };
                    descriptors.push(descriptor);
                }
                TreeEntry::Group(group) => {
                    descriptors.extend(collect_descriptors(group, scope).await?);
                }
            }
        }
        Ok(descriptors)
    }
    .boxed()
}
