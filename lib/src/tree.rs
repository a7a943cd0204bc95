//! # autocli Command Tree Construction
//!
//! File: lib/src/tree.rs
//!
//! ## Overview
//!
//! The tree builder owns the group hierarchy during one construction pass.
//! Modules are registered one at a time, in discovery order:
//!
//! 1. Every ancestor group of the module's `CommandPath` is looked up by its
//!    prefix key (`user`, `user__db`, ...) and created on first need.
//! 2. The module's `configure` routine is called with a [`GroupHandle`] for the
//!    parent group and the leaf name. The module builds its own `clap::Command`
//!    and attaches it with [`GroupHandle::add_leaf`], which also binds the
//!    module's `execute` routine as that leaf's handler.
//! 3. A failure is returned to the caller for logging. Nothing is rolled back:
//!    groups and leaves added before the failure stay in the tree.
//!
//! `clap::Command` values are owned, so group commands are kept in a map while
//! the pass runs and folded into their parents, deepest first, by
//! [`TreeBuilder::finish`].
//!
use crate::core::error::{AutocliError, Result};
use crate::discovery::naming::CommandPath;
use crate::registry::{ExecuteFn, ModuleDescriptor};
use clap::Command;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// Leaf handlers keyed by the full segment list of the leaf.
pub(crate) type HandlerMap = HashMap<Vec<String>, ExecuteFn>;

/// # Group Handle (`GroupHandle`)
///
/// What a module's `configure` routine receives: the parent group it is being
/// registered under.
pub struct GroupHandle<'a> {
    segments: &'a [String],
    command: &'a mut Command,
    child_groups: &'a HashSet<String>,
    handlers: &'a mut HandlerMap,
    leaves: &'a mut BTreeSet<CommandPath>,
    execute: ExecuteFn,
    added: usize,
}

impl<'a> GroupHandle<'a> {
    /// Segments of the group this handle refers to. Empty for the root.
    pub fn path(&self) -> &[String] {
        self.segments
    }

    /// The group's `clap::Command` as built so far.
    pub fn command(&self) -> &Command {
        self.command
    }

    /// # Add Leaf (`add_leaf`)
    ///
    /// Attaches `leaf` as a subcommand of this group and binds the module's
    /// `execute` routine as the handler for it.
    ///
    /// ## Returns
    ///
    /// * `Err(AutocliError::DuplicateCommand)` if the group already has a leaf
    ///   or sub-group with the same name.
    pub fn add_leaf(&mut self, leaf: Command) -> Result<()> {
        let name = leaf.get_name().to_string();
        let mut segments = self.segments.to_vec();
        segments.push(name.clone());
        let path = CommandPath::new(segments.clone())?;

        if self.command.find_subcommand(&name).is_some() || self.child_groups.contains(&name) {
            return Err(AutocliError::DuplicateCommand {
                path: path.to_string(),
            }
            .into());
        }

        let group = std::mem::replace(self.command, Command::new(""));
        *self.command = group.subcommand(leaf);
        self.handlers.insert(segments, self.execute.clone());
        debug!("Registered leaf '{}'", path);
        self.leaves.insert(path);
        self.added += 1;
        Ok(())
    }
}

struct GroupNode {
    name: String,
    parent: String,
    depth: usize,
    command: Command,
}

/// # Command Tree (`CommandTree`)
///
/// Shape of a finished tree: the prefix keys of every group and the path of
/// every leaf. Two trees built from the same files compare equal regardless of
/// discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTree {
    groups: BTreeSet<String>,
    leaves: BTreeSet<CommandPath>,
}

impl CommandTree {
    /// Prefix keys of all non-root groups (`user`, `user__db`, ...).
    pub fn groups(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(String::as_str)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &CommandPath> + '_ {
        self.leaves.iter()
    }

    pub fn contains_group(&self, key: &str) -> bool {
        self.groups.contains(key)
    }

    pub fn contains_leaf(&self, segments: &[&str]) -> bool {
        self.leaves
            .iter()
            .any(|leaf| leaf.segments().iter().map(String::as_str).eq(segments.iter().copied()))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.leaves.is_empty()
    }
}

/// # Tree Builder (`TreeBuilder`)
///
/// Holds the root command, the key → group mapping, and the bound handlers for
/// one construction pass.
pub struct TreeBuilder {
    root: Command,
    groups: HashMap<String, GroupNode>,
    order: Vec<String>,
    handlers: HandlerMap,
    leaves: BTreeSet<CommandPath>,
}

impl TreeBuilder {
    /// Starts a pass on `root`, which gets a required subcommand selector.
    /// clap's generated `help` subcommand is disabled on the root and on every
    /// group, so a command file named `help` is an ordinary leaf.
    pub fn new(root: Command) -> Self {
        Self {
            root: root.subcommand_required(true).disable_help_subcommand(true),
            groups: HashMap::new(),
            order: Vec::new(),
            handlers: HashMap::new(),
            leaves: BTreeSet::new(),
        }
    }

    /// # Register Module (`register`)
    ///
    /// Ensures the ancestor groups of `path` exist, then lets `module` configure
    /// its leaf under the parent group.
    ///
    /// ## Returns
    ///
    /// * `Err(AutocliError::DuplicateCommand)` if a group would shadow an
    ///   existing leaf, or the module's leaf collides with a sibling.
    /// * `Err(AutocliError::ModuleContract)` if `module` lacks a capability.
    /// * `Err(AutocliError::ModuleConfigure)` if the configure routine fails.
    pub fn register(
        &mut self,
        identifier: &str,
        path: &CommandPath,
        module: &ModuleDescriptor,
    ) -> std::result::Result<(), AutocliError> {
        let (configure, execute) = match (module.configure(), module.execute()) {
            (Some(configure), Some(execute)) => (configure.clone(), execute.clone()),
            _ => {
                return Err(AutocliError::ModuleContract {
                    identifier: identifier.to_string(),
                    missing: module.missing_capabilities(),
                })
            }
        };

        let parent_key = self.ensure_groups(path)?;
        let child_groups: HashSet<String> = self
            .groups
            .values()
            .filter(|g| g.parent == parent_key)
            .map(|g| g.name.clone())
            .collect();

        let command = if parent_key.is_empty() {
            &mut self.root
        } else {
            match self.groups.get_mut(&parent_key) {
                Some(node) => &mut node.command,
                None => {
                    return Err(AutocliError::ModuleConfigure {
                        identifier: identifier.to_string(),
                        cause: format!("group '{}' vanished during registration", parent_key),
                    })
                }
            }
        };

        let mut handle = GroupHandle {
            segments: path.groups(),
            command,
            child_groups: &child_groups,
            handlers: &mut self.handlers,
            leaves: &mut self.leaves,
            execute,
            added: 0,
        };
        let outcome = configure(&mut handle, path.leaf());
        let added = handle.added;

        if let Err(e) = outcome {
            return Err(match e.downcast::<AutocliError>() {
                Ok(dup @ AutocliError::DuplicateCommand { .. }) => dup,
                Ok(other) => AutocliError::ModuleConfigure {
                    identifier: identifier.to_string(),
                    cause: other.to_string(),
                },
                Err(e) => AutocliError::ModuleConfigure {
                    identifier: identifier.to_string(),
                    cause: format!("{:#}", e),
                },
            });
        }
        if added == 0 {
            warn!(
                "Module {} configured without adding a command for '{}'.",
                identifier, path
            );
        }
        Ok(())
    }

    /// Creates the missing ancestor groups of `path` and returns the parent's key.
    fn ensure_groups(&mut self, path: &CommandPath) -> std::result::Result<String, AutocliError> {
        let mut parent_key = String::new();
        for (index, segment) in path.groups().iter().enumerate() {
            let key = path.prefix_key(index + 1);
            if !self.groups.contains_key(&key) {
                let parent = self.command_for(&parent_key);
                if parent.map_or(false, |cmd| cmd.find_subcommand(segment).is_some()) {
                    return Err(AutocliError::DuplicateCommand {
                        path: path.segments()[..=index].join(" "),
                    });
                }
                debug!("Creating group '{}'", key);
                let command = Command::new(segment.clone())
                    .about(format!("Subcommands for the '{}' group", segment))
                    .subcommand_required(true)
                    .disable_help_subcommand(true);
                self.groups.insert(
                    key.clone(),
                    GroupNode {
                        name: segment.clone(),
                        parent: parent_key.clone(),
                        depth: index + 1,
                        command,
                    },
                );
                self.order.push(key.clone());
            }
            parent_key = key;
        }
        Ok(parent_key)
    }

    fn command_for(&self, key: &str) -> Option<&Command> {
        if key.is_empty() {
            Some(&self.root)
        } else {
            self.groups.get(key).map(|node| &node.command)
        }
    }

    /// # Finish Pass (`finish`)
    ///
    /// Folds every group into its parent, deepest first, and returns the nested
    /// root command with the tree shape and the bound handlers.
    pub(crate) fn finish(mut self) -> (Command, CommandTree, HandlerMap) {
        let tree = CommandTree {
            groups: self.groups.keys().cloned().collect(),
            leaves: std::mem::take(&mut self.leaves),
        };

        let mut order = std::mem::take(&mut self.order);
        order.sort_by_key(|key| std::cmp::Reverse(self.groups.get(key).map_or(0, |n| n.depth)));
        for key in order {
            let node = match self.groups.remove(&key) {
                Some(node) => node,
                None => continue,
            };
            let parent = if node.parent.is_empty() {
                &mut self.root
            } else {
                match self.groups.get_mut(&node.parent) {
                    Some(parent) => &mut parent.command,
                    None => continue,
                }
            };
            let folded = std::mem::replace(parent, Command::new(""));
            *parent = folded.subcommand(node.command);
        }
        debug_assert!(self.groups.is_empty(), "every group is folded into its parent");

        (self.root, tree, self.handlers)
    }
}
