//! # Command Tree
//!
//! The in-memory registry of every loaded command: a rooted, ordered hierarchy
//! of named groups and leaves.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Sibling order is the order the loader produced and is the tie-break for
//! every lookup: traversals are depth-first and pre-order, descending into a
//! group before moving on to the next sibling. Names are not required to be
//! unique.

use super::definition::Command;

/// Names starting with this character are never loaded
pub const HIDDEN_PREFIX: char = '_';

/// A leaf: one command under the name it was registered with
#[derive(Debug, Clone)]
pub struct NamedEntry {
    pub name: String,
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum TreeEntry {
    Command(NamedEntry),
    Group(CommandTree),
}

#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    /// Group name; empty for the root
    pub group: String,
    pub entries: Vec<TreeEntry>,
}

impl CommandTree {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            entries: Vec::new(),
        }
    }

    /// The unnamed root group
    pub fn root() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, name: impl Into<String>, command: Command) -> Self {
        self.entries.push(TreeEntry::Command(NamedEntry {
            name: name.into(),
            command,
        }));
        self
    }

    pub fn with_group(mut self, group: CommandTree) -> Self {
        self.entries.push(TreeEntry::Group(group));
        self
    }

    /// Immediate leaves, in order
    pub fn commands(&self) -> impl Iterator<Item = &NamedEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            TreeEntry::Command(named) => Some(named),
            TreeEntry::Group(_) => None,
        })
    }

    /// Immediate sub-groups, in order
    pub fn groups(&self) -> impl Iterator<Item = &CommandTree> {
        self.entries.iter().filter_map(|entry| match entry {
            TreeEntry::Group(group) => Some(group),
            TreeEntry::Command(_) => None,
        })
    }

    /// Number of leaves at any depth
    pub fn command_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                TreeEntry::Command(_) => 1,
                TreeEntry::Group(group) => group.command_count(),
            })
            .sum()
    }

    /// Apply `f` to every leaf in traversal order and return the first `Some`
    pub fn find_map<'a, T, F>(&'a self, f: &mut F) -> Option<T>
    where
        F: FnMut(&'a NamedEntry) -> Option<T>,
    {
        for entry in &self.entries {
            let found = match entry {
                TreeEntry::Command(named) => f(named),
                TreeEntry::Group(group) => group.find_map(f),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// First command in traversal order whose entry satisfies `predicate`
    pub fn find_with<F>(&self, mut predicate: F) -> Option<&Command>
    where
        F: FnMut(&NamedEntry) -> bool,
    {
        self.find_map(&mut |entry| predicate(entry).then_some(&entry.command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::definition::tests::Reply;
    use crate::commands::definition::{create_command, SlashCommand};

    fn slash(help: &str) -> Command {
        create_command(help, SlashCommand::new(Reply("ok")))
    }

    fn help_of(command: &Command) -> &str {
        command.as_slash().map(|s| s.help_text()).unwrap_or_default()
    }

    fn sample() -> CommandTree {
        CommandTree::root()
            .with_command("a", slash("first a"))
            .with_group(
                CommandTree::new("g1")
                    .with_command("b", slash("g1 b"))
                    .with_group(CommandTree::new("deep").with_command("c", slash("deep c"))),
            )
            .with_command("c", slash("root c"))
            .with_group(CommandTree::new("g2").with_command("b", slash("g2 b")))
    }

    #[test]
    fn test_traversal_is_preorder() {
        let tree = sample();
        let mut visited = Vec::new();
        let none: Option<()> = tree.find_map(&mut |entry| {
            visited.push(entry.name.clone());
            None
        });
        assert!(none.is_none());
        assert_eq!(visited, vec!["a", "b", "c", "c", "b"]);
    }

    #[test]
    fn test_nested_group_visited_before_next_sibling() {
        let tree = sample();
        let found = tree.find_with(|entry| entry.name == "c").unwrap();
        assert_eq!(help_of(found), "deep c");
    }

    #[test]
    fn test_first_group_wins_for_duplicate_names() {
        let tree = sample();
        let found = tree.find_with(|entry| entry.name == "b").unwrap();
        assert_eq!(help_of(found), "g1 b");
    }

    #[test]
    fn test_missing_returns_none() {
        assert!(sample().find_with(|entry| entry.name == "zzz").is_none());
        assert!(CommandTree::root().find_with(|_| true).is_none());
    }

    #[test]
    fn test_immediate_children() {
        let tree = sample();
        let leaves: Vec<&str> = tree.commands().map(|c| c.name.as_str()).collect();
        let groups: Vec<&str> = tree.groups().map(|g| g.group.as_str()).collect();
        assert_eq!(leaves, vec!["a", "c"]);
        assert_eq!(groups, vec!["g1", "g2"]);
        assert_eq!(tree.command_count(), 5);
    }
}
