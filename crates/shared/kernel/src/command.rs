//! Directives a module understands.

use crate::error::KernelError;
use crate::setter::{Binding, Setter};
use cradle_domain::CommandType;
use cradle_domain::registry::ModuleConf;
use std::borrow::Cow;

/// One directive: its name, the contexts it is legal in and what it does.
#[derive(Debug, Clone)]
pub struct Command {
    name: Cow<'static, str>,
    contexts: CommandType,
    setter: Setter,
}

impl Command {
    /// Terminates a command table. Entries after it are never scanned.
    pub const END: Self = Self {
        name: Cow::Borrowed(""),
        contexts: CommandType::empty(),
        setter: Setter::Block(CommandType::empty()),
    };

    pub fn new(name: impl Into<Cow<'static, str>>, contexts: CommandType, setter: Setter) -> Self {
        Self { name: name.into(), contexts, setter }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn contexts(&self) -> CommandType {
        self.contexts
    }

    #[must_use]
    pub const fn setter(&self) -> &Setter {
        &self.setter
    }

    #[must_use]
    pub fn is_end(&self) -> bool {
        self.name.is_empty()
    }

    /// Runs the field setter for `binding` against the module's structure.
    ///
    /// # Errors
    /// [`KernelError::StaleBinding`] when the binding names another directive,
    /// [`KernelError::Internal`] for block commands, or whatever the setter reports.
    pub fn apply(&self, binding: &Binding<'_>, conf: &mut dyn ModuleConf) -> Result<(), KernelError> {
        if binding.directive() != self.name {
            return Err(KernelError::StaleBinding {
                directive: self.name.clone(),
                bound: binding.directive().to_owned().into(),
                context: None,
            });
        }
        match &self.setter {
            Setter::Field { set, .. } => set(binding, conf),
            Setter::Block(_) => {
                Err(format!("block directive `{}` has no field to set", self.name).into())
            },
        }
    }
}

/// A module's ordered directive list.
///
/// Lookups walk the entries in order and stop at the first [`Command::END`];
/// anything after it is unreachable.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: Vec<Command>,
}

impl CommandTable {
    /// Wraps `entries` as given; no terminator is added.
    #[must_use]
    pub const fn from_entries(entries: Vec<Command>) -> Self {
        Self { entries }
    }

    /// Appends a terminator unless the entries already contain one.
    #[must_use]
    pub fn terminated(mut entries: Vec<Command>) -> Self {
        if !entries.iter().any(Command::is_end) {
            entries.push(Command::END);
        }
        Self { entries }
    }

    /// Reachable commands, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.entries.iter().take_while(|command| !command.is_end())
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Command> {
        self.iter().find(|command| command.name() == name)
    }

    /// Number of reachable commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Entries that follow the terminator.
    #[must_use]
    pub fn unreachable(&self) -> usize {
        self.entries.len() - self.len()
    }
}
