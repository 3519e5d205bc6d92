//! Static command registration table
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Path-keyed table served to the tree loader as a module source
//! - 1.0.0: Initial implementation for handler dispatch

use async_trait::async_trait;

use super::definition::Command;
use super::loader::{ModuleSource, SourceEntry};
use crate::core::RouterError;

/// Extension given to every registered leaf so it reads like a module file
const MODULE_EXTENSION: &str = "rs";

/// Ordered table of commands keyed by their path in the tree
///
/// Listing a location yields its children in first-registration order, so the
/// order of `with` calls is the sibling order of the loaded tree.
///
/// # Example
///
/// ```ignore
/// let table = RegistrationTable::new()
///     .with("test", test::command())
///     .with("dnd/roll", dnd::roll::command());
/// let tree = load_tree(&table).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistrationTable {
    entries: Vec<(Vec<String>, Command)>,
}

impl RegistrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `command` at a `/`-separated path; the last segment is its name
    pub fn with(mut self, path: &str, command: Command) -> Self {
        let mut segments: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(leaf) = segments.last_mut() {
            *leaf = format!("{leaf}.{MODULE_EXTENSION}");
            self.entries.push((segments, command));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ModuleSource for RegistrationTable {
    async fn list(&self, location: &[String]) -> Result<Vec<SourceEntry>, RouterError> {
        let mut children: Vec<SourceEntry> = Vec::new();
        let mut known = location.is_empty();

        for (segments, _) in &self.entries {
            if segments.len() <= location.len() || !segments.starts_with(location) {
                continue;
            }
            known = true;
            let file_name = &segments[location.len()];
            if children.iter().any(|child| &child.file_name == file_name) {
                continue;
            }
            if segments.len() > location.len() + 1 {
                children.push(SourceEntry::dir(file_name.clone()));
            } else {
                children.push(SourceEntry::file(file_name.clone()));
            }
        }

        if !known {
            return Err(RouterError::load(location, "no commands registered here"));
        }
        Ok(children)
    }

    async fn export(&self, location: &[String]) -> Option<Command> {
        self.entries
            .iter()
            .find(|(segments, _)| segments.as_slice() == location)
            .map(|(_, command)| command.clone())
    }
}
