//! Module descriptors.

use crate::command::{Command, CommandTable};
use crate::cycle::Cycle;
use cradle_domain::registry::{ConfFactory, ModuleConf, default_conf};
use cradle_domain::{ModuleType, Status};
use std::borrow::Cow;

/// A lifecycle callback. It receives the cycle, so it can read any module's
/// configuration, and the descriptor of the module it belongs to.
pub type Hook = fn(&mut Cycle, &Module) -> Status;

/// Everything the kernel knows about a module.
///
/// `index` and `ctx_index` are assigned by
/// [`RegistryBuilder::register`](crate::registry::RegistryBuilder::register).
#[derive(Debug, Clone)]
pub struct Module {
    name: Cow<'static, str>,
    index: usize,
    ctx_index: Option<usize>,
    module_type: ModuleType,
    commands: CommandTable,
    conf: Option<ConfFactory>,
    init: Option<Hook>,
    main: Option<Hook>,
}

impl Module {
    pub fn builder(name: impl Into<Cow<'static, str>>) -> ModuleBuilder {
        ModuleBuilder {
            name: name.into(),
            module_type: ModuleType::default(),
            commands: Vec::new(),
            table: None,
            conf: None,
            init: None,
            main: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registration ordinal. Dispatch and hooks follow this order.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Slot of the module's configuration structure inside a cycle, if it has one.
    #[must_use]
    pub const fn ctx_index(&self) -> Option<usize> {
        self.ctx_index
    }

    #[must_use]
    pub const fn module_type(&self) -> ModuleType {
        self.module_type
    }

    #[must_use]
    pub const fn commands(&self) -> &CommandTable {
        &self.commands
    }

    #[must_use]
    pub const fn conf_factory(&self) -> Option<ConfFactory> {
        self.conf
    }

    #[must_use]
    pub const fn init_hook(&self) -> Option<Hook> {
        self.init
    }

    #[must_use]
    pub const fn main_hook(&self) -> Option<Hook> {
        self.main
    }

    pub(crate) fn name_cow(&self) -> Cow<'static, str> {
        self.name.clone()
    }

    pub(crate) const fn assign(&mut self, index: usize, ctx_index: Option<usize>) {
        self.index = index;
        self.ctx_index = ctx_index;
    }
}

/// Builder for [`Module`].
#[derive(Debug)]
pub struct ModuleBuilder {
    name: Cow<'static, str>,
    module_type: ModuleType,
    commands: Vec<Command>,
    table: Option<CommandTable>,
    conf: Option<ConfFactory>,
    init: Option<Hook>,
    main: Option<Hook>,
}

impl ModuleBuilder {
    #[must_use]
    pub const fn module_type(mut self, module_type: ModuleType) -> Self {
        self.module_type = module_type;
        self
    }

    /// Gives the module a configuration structure of type `C`, created fresh
    /// from `Default` for every cycle.
    #[must_use]
    pub fn conf<C: ModuleConf + Default>(mut self) -> Self {
        self.conf = Some(default_conf::<C>);
        self
    }

    #[must_use]
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Uses a prepared table verbatim, terminator placement included.
    /// Commands added with [`ModuleBuilder::command`] are ignored.
    #[must_use]
    pub fn table(mut self, table: CommandTable) -> Self {
        self.table = Some(table);
        self
    }

    #[must_use]
    pub const fn init(mut self, hook: Hook) -> Self {
        self.init = Some(hook);
        self
    }

    #[must_use]
    pub const fn main(mut self, hook: Hook) -> Self {
        self.main = Some(hook);
        self
    }

    #[must_use]
    pub fn build(self) -> Module {
        Module {
            name: self.name,
            index: 0,
            ctx_index: None,
            module_type: self.module_type,
            commands: self.table.unwrap_or_else(|| CommandTable::terminated(self.commands)),
            conf: self.conf,
            init: self.init,
            main: self.main,
        }
    }
}
