//! The ordered set of modules known to the process.
//!
//! Modules are registered once at startup through a [`RegistryBuilder`]; sealing
//! it yields a shared, read-only [`Registry`]. Registration order is the order in
//! which the dispatcher scans modules and in which hooks run.

use crate::error::KernelError;
use crate::module::Module;
use fxhash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Indices assigned to a module at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleHandle {
    pub index: usize,
    pub ctx_index: Option<usize>,
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    modules: Vec<Module>,
    names: FxHashSet<String>,
    conf_slots: usize,
}

impl RegistryBuilder {
    /// Appends a module and assigns its indices.
    ///
    /// # Errors
    /// [`KernelError::DuplicateRegistration`] when the module name is taken or
    /// the module declares the same directive twice; [`KernelError::ConfMismatch`]
    /// when a directive writes a field but the module has no configuration
    /// structure; [`KernelError::Internal`] for an empty module name.
    pub fn register(&mut self, mut module: Module) -> Result<ModuleHandle, KernelError> {
        if module.name().is_empty() {
            return Err("module name cannot be empty".into());
        }
        if self.names.contains(module.name()) {
            return Err(KernelError::DuplicateRegistration {
                message: format!("module `{}` is already registered", module.name()).into(),
                context: None,
            });
        }

        let mut directives = FxHashSet::default();
        for command in module.commands().iter() {
            if !directives.insert(command.name()) {
                return Err(KernelError::DuplicateRegistration {
                    message: format!(
                        "module `{}` declares `{}` more than once",
                        module.name(),
                        command.name()
                    )
                    .into(),
                    context: None,
                });
            }
        }

        if module.conf_factory().is_none()
            && let Some(command) = module.commands().iter().find(|c| c.setter().field().is_some())
        {
            return Err(KernelError::ConfMismatch {
                module: module.name_cow(),
                expected: "configuration structure",
                context: Some(format!("directive `{}` sets a field", command.name()).into()),
            });
        }

        let unreachable = module.commands().unreachable();
        if unreachable > 1 {
            warn!(
                module = module.name(),
                entries = unreachable - 1,
                "Command table has entries after its terminator; they will never match"
            );
        }

        let index = self.modules.len();
        let ctx_index = module.conf_factory().map(|_| {
            self.conf_slots += 1;
            self.conf_slots - 1
        });
        module.assign(index, ctx_index);

        debug!(module = module.name(), index, ?ctx_index, "Module registered");
        self.names.insert(module.name().to_owned());
        self.modules.push(module);

        Ok(ModuleHandle { index, ctx_index })
    }

    /// Chaining form of [`RegistryBuilder::register`].
    ///
    /// # Errors
    /// Same as [`RegistryBuilder::register`].
    pub fn with(mut self, module: Module) -> Result<Self, KernelError> {
        self.register(module)?;
        Ok(self)
    }

    /// Freezes the registry. No module can be added afterwards.
    #[must_use]
    pub fn seal(self) -> Arc<Registry> {
        Arc::new(Registry { modules: self.modules, conf_slots: self.conf_slots })
    }
}

#[derive(Debug)]
pub struct Registry {
    modules: Vec<Module>,
    conf_slots: usize,
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Modules in registration order.
    #[must_use]
    pub fn all(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Module> {
        self.modules.get(index)
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|module| module.name() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Number of modules that own a configuration structure.
    #[must_use]
    pub const fn conf_slots(&self) -> usize {
        self.conf_slots
    }
}
