//! Init and main hooks.
//!
//! Hooks run in registration order, each at most once per cycle. Init hooks
//! validate and derive settings from a configured cycle; main hooks start the
//! module's work. Main hooks only run after every init hook succeeded.
//!
//! A hook answering [`Status::Again`] is not ready, which fails the phase like
//! [`Status::Error`]. Hooks are never called a second time.

use crate::cycle::{Cycle, CycleState};
use crate::error::KernelError;
use crate::module::{Hook, Module};
use cradle_domain::Status;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Runs every init hook.
///
/// # Errors
/// [`KernelError::InvalidState`] unless the cycle is configured;
/// [`KernelError::InitFailed`] for the first hook that fails, after which the
/// cycle is marked failed and later hooks are skipped.
pub fn init_modules(cycle: &mut Cycle) -> Result<(), KernelError> {
    cycle.expect_state(CycleState::Configured)?;
    run_phase(cycle, "init", Module::init_hook, |module| KernelError::InitFailed {
        module: module.name_cow(),
        context: None,
    })?;
    cycle.set_state(CycleState::Initialized);
    info!("Modules initialized");
    Ok(())
}

/// Runs every main hook.
///
/// # Errors
/// [`KernelError::InvalidState`] unless init completed;
/// [`KernelError::MainFailed`] for the first hook that fails.
pub fn run_modules(cycle: &mut Cycle) -> Result<(), KernelError> {
    cycle.expect_state(CycleState::Initialized)?;
    run_phase(cycle, "main", Module::main_hook, |module| KernelError::MainFailed {
        module: module.name_cow(),
        context: None,
    })?;
    cycle.set_state(CycleState::Running);
    info!("Modules running");
    Ok(())
}

/// [`init_modules`] followed by [`run_modules`].
///
/// # Errors
/// See the two phases.
pub fn start(cycle: &mut Cycle) -> Result<(), KernelError> {
    init_modules(cycle)?;
    run_modules(cycle)
}

fn run_phase(
    cycle: &mut Cycle,
    phase: &'static str,
    hook_of: fn(&Module) -> Option<Hook>,
    failure: fn(&Module) -> KernelError,
) -> Result<(), KernelError> {
    let registry = Arc::clone(cycle.registry());
    for module in registry.all() {
        let Some(hook) = hook_of(module) else {
            continue;
        };
        let status = hook(cycle, module);
        if status.is_success() {
            debug!(module = module.name(), phase, %status, "Hook finished");
            continue;
        }
        cycle.set_state(CycleState::Failed);
        if status == Status::Again {
            error!(module = module.name(), phase, "Module is not ready");
        } else {
            error!(module = module.name(), phase, %status, "Hook failed");
        }
        return Err(failure(module));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::dispatch;
    use crate::registry::Registry;
    use cradle_domain::Value;

    #[cradle_derive::module_conf]
    struct Counter {
        init: u32,
        main: u32,
    }

    fn bump_init(cycle: &mut Cycle, module: &Module) -> Status {
        match cycle.conf_mut::<Counter>(module) {
            Some(conf) => {
                conf.init += 1;
                Status::Ok
            },
            None => Status::Error,
        }
    }

    fn bump_main(cycle: &mut Cycle, module: &Module) -> Status {
        match cycle.conf_mut::<Counter>(module) {
            Some(conf) => {
                conf.main += 1;
                Status::Ok
            },
            None => Status::Error,
        }
    }

    fn not_ready(cycle: &mut Cycle, module: &Module) -> Status {
        let Some(conf) = cycle.conf_mut::<Counter>(module) else { return Status::Error };
        conf.init += 1;
        Status::Again
    }

    fn fail(_: &mut Cycle, _: &Module) -> Status {
        Status::Error
    }

    fn ignore(_: &mut Cycle, _: &Module) -> Status {
        Status::Ignore
    }

    fn configured(modules: Vec<Module>) -> Cycle {
        let mut builder = Registry::builder();
        for module in modules {
            builder.register(module).unwrap();
        }
        let mut cycle = Cycle::new(builder.seal());
        dispatch(&mut cycle, &Value::empty()).unwrap();
        cycle
    }

    fn counter(name: &'static str) -> crate::module::ModuleBuilder {
        Module::builder(name).conf::<Counter>()
    }

    #[test]
    fn hooks_run_once_in_order() {
        let mut cycle = configured(vec![
            counter("a").init(bump_init).main(bump_main).build(),
            counter("b").init(bump_init).build(),
            counter("c").init(ignore).build(),
        ]);
        start(&mut cycle).unwrap();

        assert_eq!(cycle.state(), CycleState::Running);
        assert_eq!(cycle.conf_of::<Counter>("a"), Some(&Counter { init: 1, main: 1 }));
        assert_eq!(cycle.conf_of::<Counter>("b"), Some(&Counter { init: 1, main: 0 }));

        let err = init_modules(&mut cycle).unwrap_err();
        assert!(matches!(err, KernelError::InvalidState { .. }));
        assert_eq!(cycle.conf_of::<Counter>("a").map(|c| c.init), Some(1));
    }

    #[test]
    fn failed_init_blocks_main() {
        let mut cycle = configured(vec![
            counter("a").init(fail).main(bump_main).build(),
            counter("b").init(bump_init).main(bump_main).build(),
        ]);
        let err = start(&mut cycle).unwrap_err();

        assert!(matches!(err, KernelError::InitFailed { ref module, .. } if module == "a"));
        assert_eq!(cycle.state(), CycleState::Failed);
        assert_eq!(cycle.conf_of::<Counter>("b"), Some(&Counter::default()));
        assert!(run_modules(&mut cycle).is_err());
    }

    #[test]
    fn again_fails_the_phase_after_one_call() {
        let mut cycle = configured(vec![
            counter("a").init(not_ready).main(bump_main).build(),
            counter("b").init(bump_init).build(),
        ]);
        let err = start(&mut cycle).unwrap_err();

        assert!(matches!(err, KernelError::InitFailed { ref module, .. } if module == "a"));
        assert_eq!(cycle.state(), CycleState::Failed);
        assert_eq!(cycle.conf_of::<Counter>("a"), Some(&Counter { init: 1, main: 0 }));
        assert_eq!(cycle.conf_of::<Counter>("b"), Some(&Counter::default()));
    }

    #[test]
    fn init_requires_a_configured_cycle() {
        let registry = Registry::builder().with(counter("a").build()).unwrap().seal();
        let mut cycle = Cycle::new(registry);
        let err = init_modules(&mut cycle).unwrap_err();
        assert!(matches!(
            err,
            KernelError::InvalidState { state: CycleState::Configuring, expected: CycleState::Configured, .. }
        ));
    }
}
