//! Routes a parsed document to the modules that own its directives.
//!
//! Every key of a mapping is looked up by name across modules in registration
//! order. The first module declaring a command of that name which is legal under
//! the current command-type mask takes it; a declaration that is not legal in the
//! current context does not stop the scan.
//!
//! A document is walked twice: the first pass only routes names (entering blocks
//! as it goes), the second runs the setters. An unknown directive anywhere in the
//! tree therefore leaves every structure untouched.

use crate::command::Command;
use crate::cycle::{Cycle, CycleState};
use crate::error::KernelError;
use crate::module::Module;
use crate::registry::Registry;
use crate::setter::{Binding, Setter};
use cradle_domain::{Mapping, Value};
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// Applies `root` to the cycle's configuration structures.
///
/// A mapping is dispatched key by key; a sequence has each element dispatched
/// in order with the same context; a bare scalar cannot be routed. Returns the
/// number of field setters that ran.
///
/// # Errors
/// The first routing or setter error. The cycle is then marked
/// [`CycleState::Failed`] and [`Cycle::active`] names the failing directive.
pub fn dispatch(cycle: &mut Cycle, root: &Value) -> Result<usize, KernelError> {
    if !matches!(cycle.state(), CycleState::Configuring | CycleState::Configured) {
        return Err(KernelError::InvalidState {
            state: cycle.state(),
            expected: CycleState::Configuring,
            context: None,
        });
    }

    let registry = Arc::clone(cycle.registry());
    let mut dispatcher =
        Dispatcher { cycle: &mut *cycle, registry: &registry, pass: Pass::Route, applied: 0 };
    let result = dispatcher.walk(root).and_then(|()| {
        dispatcher.pass = Pass::Apply;
        dispatcher.walk(root)
    });

    match result {
        Ok(()) => {
            let applied = dispatcher.applied;
            cycle.set_state(CycleState::Configured);
            info!(applied, "Configuration applied");
            Ok(applied)
        },
        Err(err) => {
            cycle.set_state(CycleState::Failed);
            error!(
                module = cycle.active().map(|a| a.module.as_str()),
                error = %err,
                "Configuration rejected"
            );
            Err(err)
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Route,
    Apply,
}

struct Dispatcher<'a> {
    cycle: &'a mut Cycle,
    registry: &'a Registry,
    pass: Pass,
    applied: usize,
}

impl<'a> Dispatcher<'a> {
    fn walk(&mut self, value: &Value) -> Result<(), KernelError> {
        match value {
            Value::Mapping(map) => self.mapping(map),
            Value::Sequence(items) => items.iter().try_for_each(|item| self.walk(item)),
            Value::Scalar(_) => Err(KernelError::BareScalar { kind: value.kind(), context: None }),
        }
    }

    fn mapping(&mut self, map: &Mapping) -> Result<(), KernelError> {
        let resolved = map
            .iter()
            .map(|(key, value)| {
                self.resolve(key).map(|(module, command)| (module, command, key, value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (module, command, key, value) in resolved {
            self.apply(module, command, key, value)?;
        }
        Ok(())
    }

    fn resolve(&self, name: &str) -> Result<(&'a Module, &'a Command), KernelError> {
        let current = self.cycle.command_type();
        let filter = self.cycle.module_type();

        for module in self.registry.all() {
            if !module.module_type().eligible_under(filter) {
                continue;
            }
            let Some(command) = module.commands().find(name) else {
                continue;
            };
            if command.contexts().allowed_in(current) {
                return Ok((module, command));
            }
            trace!(directive = name, module = module.name(), "Directive not legal in this context");
        }

        Err(KernelError::UnknownDirective { directive: name.to_owned().into(), context: None })
    }

    fn apply(
        &mut self,
        module: &Module,
        command: &Command,
        key: &str,
        value: &Value,
    ) -> Result<(), KernelError> {
        if let Setter::Block(mask) = command.setter() {
            self.cycle.bind(module.name(), key);
            let previous = self.cycle.set_command_type(*mask);
            trace!(directive = key, module = module.name(), ?mask, "Entering block");
            let result = self.walk(value);
            self.cycle.set_command_type(previous);
            if result.is_ok() {
                self.cycle.unbind();
            }
            return result;
        }
        if self.pass == Pass::Route {
            return Ok(());
        }

        let Some(ctx_index) = module.ctx_index() else {
            return Err(KernelError::ConfMismatch {
                module: module.name_cow(),
                expected: "configuration structure",
                context: None,
            });
        };
        self.cycle.bind(module.name(), key);
        let binding = Binding::new(module.name(), key, value);
        command.apply(&binding, self.cycle.handle_mut(ctx_index)?)?;

        self.applied += 1;
        self.cycle.unbind();
        debug!(
            directive = key,
            module = module.name(),
            field = command.setter().field(),
            "Directive applied"
        );
        Ok(())
    }
}
