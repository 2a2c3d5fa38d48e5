//! One configuration load and the module lifecycle that follows it.

use crate::error::KernelError;
use crate::module::Module;
use crate::registry::Registry;
use cradle_domain::registry::ModuleConf;
use cradle_domain::{CommandType, ModuleType};
use std::fmt;
use std::sync::Arc;

/// Where a cycle is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleState {
    /// Structures are at their defaults; documents may be dispatched.
    Configuring,
    /// At least one document was applied successfully.
    Configured,
    /// Every init hook succeeded.
    Initialized,
    /// Main hooks have run.
    Running,
    /// A load or a hook failed. The cycle must be discarded.
    Failed,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configuring => "configuring",
            Self::Configured => "configured",
            Self::Initialized => "initialized",
            Self::Running => "running",
            Self::Failed => "failed",
        })
    }
}

/// The directive being applied, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveBinding {
    pub module: String,
    pub directive: String,
}

/// Owns one configuration structure per module that declares one, plus the
/// dispatch context: the active command-type mask and module-type filter.
#[derive(Debug)]
pub struct Cycle {
    registry: Arc<Registry>,
    confs: Vec<Box<dyn ModuleConf>>,
    command_type: CommandType,
    module_type: Option<ModuleType>,
    active: Option<ActiveBinding>,
    state: CycleState,
}

impl Cycle {
    /// Creates every module's structure from its defaults.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        let confs = registry.all().iter().filter_map(Module::conf_factory).map(|f| f()).collect();
        Self {
            registry,
            confs,
            command_type: CommandType::MAIN,
            module_type: None,
            active: None,
            state: CycleState::Configuring,
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    #[must_use]
    pub const fn state(&self) -> CycleState {
        self.state
    }

    pub(crate) const fn set_state(&mut self, state: CycleState) {
        self.state = state;
    }

    pub(crate) fn expect_state(&self, expected: CycleState) -> Result<(), KernelError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(KernelError::InvalidState { state: self.state, expected, context: None })
        }
    }

    /// Mask that directives must match at the current nesting level.
    #[must_use]
    pub const fn command_type(&self) -> CommandType {
        self.command_type
    }

    /// Replaces the mask and returns the previous one.
    pub const fn set_command_type(&mut self, command_type: CommandType) -> CommandType {
        let previous = self.command_type;
        self.command_type = command_type;
        previous
    }

    /// Only modules of this type (and configuration-only modules) are scanned
    /// while a filter is set.
    #[must_use]
    pub const fn module_type(&self) -> Option<ModuleType> {
        self.module_type
    }

    pub const fn set_module_type(&mut self, filter: Option<ModuleType>) -> Option<ModuleType> {
        let previous = self.module_type;
        self.module_type = filter;
        previous
    }

    /// The directive applied most recently, or the one that failed.
    #[must_use]
    pub const fn active(&self) -> Option<&ActiveBinding> {
        self.active.as_ref()
    }

    pub(crate) fn bind(&mut self, module: &str, directive: &str) {
        let active = self.active.get_or_insert_with(|| ActiveBinding {
            module: String::new(),
            directive: String::new(),
        });
        module.clone_into(&mut active.module);
        directive.clone_into(&mut active.directive);
    }

    pub(crate) fn unbind(&mut self) {
        self.active = None;
    }

    /// The typed structure of `module`, if it owns one of type `C`.
    #[must_use]
    pub fn conf<C: ModuleConf>(&self, module: &Module) -> Option<&C> {
        self.confs.get(module.ctx_index()?)?.as_any().downcast_ref::<C>()
    }

    #[must_use]
    pub fn conf_mut<C: ModuleConf>(&mut self, module: &Module) -> Option<&mut C> {
        self.confs.get_mut(module.ctx_index()?)?.as_any_mut().downcast_mut::<C>()
    }

    /// Looks a module up by name and returns its typed structure.
    #[must_use]
    pub fn conf_of<C: ModuleConf>(&self, name: &str) -> Option<&C> {
        let ctx_index = self.registry.find(name)?.ctx_index()?;
        self.confs.get(ctx_index)?.as_any().downcast_ref::<C>()
    }

    pub(crate) fn handle_mut(&mut self, ctx_index: usize) -> Result<&mut dyn ModuleConf, KernelError> {
        match self.confs.get_mut(ctx_index) {
            Some(conf) => Ok(conf.as_mut()),
            None => Err(format!("no configuration slot {ctx_index}").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cradle_derive::module_conf]
    struct Limits {
        max: u32,
    }

    #[cradle_derive::module_conf]
    struct Other {}

    fn registry() -> Arc<Registry> {
        Registry::builder()
            .with(Module::builder("plain").build())
            .and_then(|b| b.with(Module::builder("limits").conf::<Limits>().build()))
            .unwrap()
            .seal()
    }

    #[test]
    fn structures_start_at_defaults() {
        let registry = registry();
        let cycle = Cycle::new(Arc::clone(&registry));
        let limits = registry.find("limits").unwrap();

        assert_eq!(cycle.conf::<Limits>(limits), Some(&Limits::default()));
        assert!(cycle.conf::<Other>(limits).is_none());
        assert!(cycle.conf_of::<Limits>("plain").is_none());
        assert_eq!(cycle.state(), CycleState::Configuring);
        assert_eq!(cycle.command_type(), CommandType::MAIN);
    }

    #[test]
    fn structures_are_private_to_a_cycle() {
        let registry = registry();
        let mut first = Cycle::new(Arc::clone(&registry));
        let second = Cycle::new(Arc::clone(&registry));
        let limits = registry.find("limits").unwrap();

        first.conf_mut::<Limits>(limits).unwrap().max = 9;
        assert_eq!(first.conf_of::<Limits>("limits").map(|c| c.max), Some(9));
        assert_eq!(second.conf_of::<Limits>("limits").map(|c| c.max), Some(0));
    }

    #[test]
    fn masks_are_swapped() {
        let mut cycle = Cycle::new(registry());
        assert_eq!(cycle.set_command_type(CommandType::EVENT), CommandType::MAIN);
        assert_eq!(cycle.command_type(), CommandType::EVENT);
        assert_eq!(cycle.set_module_type(Some(ModuleType::EVENT)), None);
        assert_eq!(cycle.module_type(), Some(ModuleType::EVENT));
    }

    #[test]
    fn bindings_are_overwritten() {
        let mut cycle = Cycle::new(registry());
        cycle.bind("limits", "max");
        cycle.bind("limits", "min");
        assert_eq!(cycle.active().map(|a| a.directive.as_str()), Some("min"));
        cycle.unbind();
        assert!(cycle.active().is_none());
    }
}
