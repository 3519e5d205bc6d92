//! # Help Renderer
//!
//! Human-readable summaries of the command tree: a listing of a group's
//! commands and sub-groups, or the help text of one located command.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use super::definition::Command;
use super::tree::{CommandTree, TreeEntry};

pub const NOT_FOUND: &str = "Could not find that group/command";
pub const EMPTY_GROUP: &str = "This group has no commands";
pub const NO_HELP: &str = "No help available for this command";

/// Leaf names shown per group in a listing
pub const MAX_COMMANDS_SHOWN: usize = 4;

/// Something located in the tree by name
#[derive(Debug, Clone, Copy)]
pub enum HelpTarget<'a> {
    Command(&'a Command),
    Group(&'a CommandTree),
}

/// First leaf or group called `name`, anywhere in the tree
///
/// A group matching by name is returned before its contents are searched.
pub fn find_something<'a>(name: &str, tree: &'a CommandTree) -> Option<HelpTarget<'a>> {
    for entry in &tree.entries {
        match entry {
            TreeEntry::Command(named) if named.name == name => {
                return Some(HelpTarget::Command(&named.command));
            }
            TreeEntry::Command(_) => {}
            TreeEntry::Group(group) if group.group == name => {
                return Some(HelpTarget::Group(group));
            }
            TreeEntry::Group(group) => {
                if let Some(found) = find_something(name, group) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Walk `path` segment by segment from the root
///
/// A leaf named like the current segment ends the walk even if segments
/// remain. A segment matching neither a leaf nor a group fails the lookup.
pub fn drill_until_found_something<'a, S>(path: &[S], tree: &'a CommandTree) -> Option<HelpTarget<'a>>
where
    S: AsRef<str>,
{
    let mut current = tree;
    for segment in path {
        let segment = segment.as_ref();
        let mut next = None;
        for entry in &current.entries {
            match entry {
                TreeEntry::Command(named) if named.name == segment => {
                    return Some(HelpTarget::Command(&named.command));
                }
                TreeEntry::Group(group) if group.group == segment => {
                    next = Some(group);
                    break;
                }
                _ => {}
            }
        }
        current = next?;
    }
    Some(HelpTarget::Group(current))
}

/// Listing lines for a group, with the default number of names per sub-group
pub fn render_group(tree: &CommandTree) -> Vec<String> {
    render_group_with_limit(tree, MAX_COMMANDS_SHOWN)
}

pub fn render_group_with_limit(tree: &CommandTree, max_shown: usize) -> Vec<String> {
    let mut commands = Vec::new();
    let mut groups = Vec::new();

    for entry in &tree.entries {
        match entry {
            TreeEntry::Command(named) => commands.push(format!("`{}`", named.name)),
            TreeEntry::Group(group) => groups.push(render_group_line(group, max_shown)),
        }
    }

    let mut lines = Vec::new();
    if !commands.is_empty() {
        lines.push("**Commands** :".to_string());
        lines.extend(commands);
    }
    if !groups.is_empty() {
        lines.push("**Groups** :".to_string());
        lines.extend(groups);
    }
    lines
}

fn render_group_line(group: &CommandTree, max_shown: usize) -> String {
    let leaves: Vec<&str> = group.commands().map(|named| named.name.as_str()).collect();
    let shown = leaves
        .iter()
        .take(max_shown)
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut line = if shown.is_empty() {
        format!("{} :", group.group)
    } else {
        format!("{} : {}", group.group, shown)
    };
    if leaves.len() > max_shown || group.groups().next().is_some() {
        line.push_str(" + more");
    }
    line
}

/// Help text for an optional search
///
/// No search lists the whole tree below `intro`. A single word is looked up
/// anywhere in the tree; several words are walked as a path from the root.
pub fn get_help_text(intro: &str, tree: &CommandTree, search: Option<&str>) -> String {
    let words: Vec<&str> = search
        .map(|s| s.split_whitespace().collect())
        .unwrap_or_default();

    if words.is_empty() {
        let mut lines = vec![intro.trim_end().to_string()];
        lines.extend(render_group(tree));
        return lines.join("\n");
    }

    let found = match words.as_slice() {
        [single] => find_something(single, tree),
        path => drill_until_found_something(path, tree),
    };

    match found {
        Some(HelpTarget::Command(Command::Slash(slash))) => {
            let help = slash.help_text().trim();
            if help.is_empty() {
                NO_HELP.to_string()
            } else {
                help.to_string()
            }
        }
        Some(HelpTarget::Group(group)) => {
            let lines = render_group(group);
            if lines.is_empty() {
                EMPTY_GROUP.to_string()
            } else {
                lines.join("\n")
            }
        }
        Some(HelpTarget::Command(Command::Menu(_))) | None => NOT_FOUND.to_string(),
    }
}
