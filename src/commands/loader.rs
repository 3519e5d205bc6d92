//! # Command Tree Loader
//!
//! Builds a [`CommandTree`] from a [`ModuleSource`]: every sub-location becomes
//! a group, every file exporting a command becomes a leaf named after the
//! file stem.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::path::Path;

use async_trait::async_trait;
use futures::future::{join_all, BoxFuture, FutureExt};
use log::debug;

use super::definition::Command;
use super::tree::{CommandTree, NamedEntry, TreeEntry, HIDDEN_PREFIX};
use crate::core::RouterError;

/// Auxiliary file types that live next to commands but never define one
pub const EXCLUDED_EXTENSIONS: &[&str] = &["sql", "map"];

/// One child of a listed location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub file_name: String,
    pub is_dir: bool,
}

impl SourceEntry {
    pub fn file(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            is_dir: false,
        }
    }

    pub fn dir(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            is_dir: true,
        }
    }
}

/// Where command definitions come from
///
/// A location is the list of path segments from the root; the root itself is
/// the empty list.
#[async_trait]
pub trait ModuleSource: Send + Sync {
    /// List the immediate children of a location, in a stable order
    async fn list(&self, location: &[String]) -> Result<Vec<SourceEntry>, RouterError>;

    /// The command exported by a file, if it exports one
    async fn export(&self, location: &[String]) -> Option<Command>;
}

/// Load the whole tree, starting at the root
pub async fn load_tree<S>(source: &S) -> Result<CommandTree, RouterError>
where
    S: ModuleSource + ?Sized,
{
    load_location(source, Vec::new(), String::new()).await
}

fn load_location<'a, S>(
    source: &'a S,
    location: Vec<String>,
    group: String,
) -> BoxFuture<'a, Result<CommandTree, RouterError>>
where
    S: ModuleSource + ?Sized,
{
    async move {
        let children = source.list(&location).await?;
        debug!(
            "Listed {} entries in '{}'",
            children.len(),
            location.join("/")
        );

        let pending = children
            .into_iter()
            .filter(is_candidate)
            .map(|child| {
                let mut path = location.clone();
                path.push(child.file_name.clone());
                load_child(source, path, child)
            });

        // Children load concurrently; join_all keeps listing order.
        let mut entries = Vec::new();
        for loaded in join_all(pending).await {
            if let Some(entry) = loaded? {
                entries.push(entry);
            }
        }

        Ok(CommandTree { group, entries })
    }
    .boxed()
}

async fn load_child<S>(
    source: &S,
    path: Vec<String>,
    child: SourceEntry,
) -> Result<Option<TreeEntry>, RouterError>
where
    S: ModuleSource + ?Sized,
{
    if child.is_dir {
        let tree = load_location(source, path, child.file_name).await?;
        return Ok(Some(TreeEntry::Group(tree)));
    }

    let Some(name) = file_stem(&child.file_name) else {
        return Ok(None);
    };
    match source.export(&path).await {
        Some(command) => Ok(Some(TreeEntry::Command(NamedEntry { name, command }))),
        None => {
            debug!("Skipping '{}': no command export", path.join("/"));
            Ok(None)
        }
    }
}

fn is_candidate(child: &SourceEntry) -> bool {
    if child.file_name.starts_with(HIDDEN_PREFIX) {
        return false;
    }
    if child.is_dir {
        return true;
    }
    let extension = Path::new(&child.file_name)
        .extension()
        .and_then(|ext| ext.to_str());
    !matches!(extension, Some(ext) if EXCLUDED_EXTENSIONS.contains(&ext))
}

fn file_stem(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}
