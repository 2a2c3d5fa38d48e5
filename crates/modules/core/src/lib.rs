//! Core module: process-wide directives and the `events` block.
//!
//! ```yaml
//! worker_threads: 4
//! pid: /run/cradle.pid
//! shutdown_timeout: 10
//! env: [RUST_BACKTRACE=1, TZ]
//! events:
//!   worker_connections: 1024
//! ```

mod error;

pub use crate::error::{CoreError, CoreErrorExt};

use cradle_kernel::prelude::*;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

/// Registered name of the module.
pub const NAME: &str = "core";

/// Upper bound for `worker_threads`.
pub const MAX_WORKER_THREADS: usize = 512;

/// `shutdown_timeout` used when the document leaves it at zero.
pub const DEFAULT_SHUTDOWN_TIMEOUT: u64 = 5;

/// Settings of the core module. Zero and empty values mean "not configured";
/// the init hook replaces them with defaults.
#[cradle_derive::module_conf]
pub struct CoreConf {
    /// Threads of the async runtime; 0 resolves to the available parallelism.
    pub worker_threads: usize,
    /// Path of the pid file written by the main hook.
    pub pid: String,
    /// Seconds granted to modules to stop after a shutdown signal.
    pub shutdown_timeout: u64,
    /// Environment entries (`NAME` or `NAME=VALUE`) exposed to the process.
    pub env: Vec<String>,
}

impl CoreConf {
    /// The core settings of a configured cycle.
    #[must_use]
    pub fn of(cycle: &Cycle) -> Option<&Self> {
        cycle.conf_of::<Self>(NAME)
    }

    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// `env` entries split into name and optional value.
    pub fn env_pairs(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.env.iter().map(|entry| match entry.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (entry.as_str(), None),
        })
    }
}

/// The core module descriptor.
#[must_use]
pub fn module() -> Module {
    Module::builder(NAME)
        .module_type(ModuleType::CORE)
        .conf::<CoreConf>()
        .command(Command::new(
            "worker_threads",
            CommandType::MAIN,
            setter::number::<CoreConf, usize>("worker_threads", |c| &mut c.worker_threads),
        ))
        .command(Command::new(
            "pid",
            CommandType::MAIN,
            setter::string::<CoreConf>("pid", |c| &mut c.pid),
        ))
        .command(Command::new(
            "shutdown_timeout",
            CommandType::MAIN,
            setter::number::<CoreConf, u64>("shutdown_timeout", |c| &mut c.shutdown_timeout),
        ))
        .command(Command::new(
            "env",
            CommandType::MAIN,
            setter::custom::<CoreConf, _>("env", ValueKind::Sequence, set_env),
        ))
        .command(Command::new("events", CommandType::MAIN, setter::block(CommandType::EVENT)))
        .init(on_init)
        .main(on_main)
        .build()
}

/// Accepts a single string or a sequence of strings.
fn set_env(binding: &Binding<'_>, conf: &mut CoreConf) -> Result<(), KernelError> {
    let value = binding.value();
    if let Some(entry) = value.as_str() {
        conf.env.push(entry.to_owned());
        return Ok(());
    }
    let items = value.as_sequence().ok_or_else(|| binding.mismatch(ValueKind::Sequence))?;
    let entries = items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_owned).ok_or_else(|| binding.mismatch(ValueKind::String))
        })
        .collect::<Result<Vec<_>, _>>()?;
    conf.env.extend(entries);
    Ok(())
}

fn on_init(cycle: &mut Cycle, module: &Module) -> Status {
    let Some(conf) = cycle.conf_mut::<CoreConf>(module) else {
        return Status::Error;
    };
    match resolve(conf) {
        Ok(()) => {
            info!(
                worker_threads = conf.worker_threads,
                shutdown_timeout = conf.shutdown_timeout,
                "Core module initialized"
            );
            Status::Ok
        },
        Err(err) => {
            error!(error = %err, "Core module rejected its configuration");
            Status::Error
        },
    }
}

fn on_main(cycle: &mut Cycle, module: &Module) -> Status {
    let Some(conf) = cycle.conf::<CoreConf>(module) else {
        return Status::Error;
    };
    if conf.pid.is_empty() {
        return Status::Ignore;
    }
    match write_pid(Path::new(&conf.pid)) {
        Ok(()) => Status::Ok,
        Err(err) => {
            error!(error = %err, "Failed to write pid file");
            Status::Error
        },
    }
}

/// Validates the configured values and fills in defaults.
///
/// # Errors
/// [`CoreError::Config`] for values outside their accepted range.
pub fn resolve(conf: &mut CoreConf) -> Result<(), CoreError> {
    if conf.worker_threads > MAX_WORKER_THREADS {
        return Err(CoreError::Config {
            message: format!(
                "worker_threads is {}, at most {MAX_WORKER_THREADS} are allowed",
                conf.worker_threads
            )
            .into(),
            context: None,
        });
    }
    if conf.worker_threads == 0 {
        conf.worker_threads = std::thread::available_parallelism().map_or(1, usize::from);
    }
    if conf.shutdown_timeout == 0 {
        conf.shutdown_timeout = DEFAULT_SHUTDOWN_TIMEOUT;
    }
    if conf.pid.ends_with('/') {
        return Err(CoreError::Config {
            message: format!("pid `{}` names a directory", conf.pid).into(),
            context: None,
        });
    }
    if let Some((name, _)) = conf.env_pairs().find(|(name, _)| !is_env_name(name)) {
        return Err(CoreError::Config {
            message: format!("`{name}` is not a valid environment variable name").into(),
            context: None,
        });
    }
    Ok(())
}

fn is_env_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn write_pid(path: &Path) -> Result<(), CoreError> {
    std::fs::write(path, format!("{}\n", std::process::id()))
        .context(format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Pid file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_get_defaults() {
        let mut conf = CoreConf::default();
        resolve(&mut conf).unwrap();
        assert!(conf.worker_threads >= 1);
        assert_eq!(conf.shutdown_timeout(), Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT));
    }

    #[test]
    fn too_many_threads_are_rejected() {
        let mut conf = CoreConf { worker_threads: MAX_WORKER_THREADS + 1, ..CoreConf::default() };
        assert!(matches!(resolve(&mut conf), Err(CoreError::Config { .. })));
    }

    #[test]
    fn env_names_are_checked() {
        let mut conf = CoreConf {
            env: vec!["TZ".to_owned(), "RUST_LOG=debug".to_owned()],
            ..CoreConf::default()
        };
        resolve(&mut conf).unwrap();
        assert_eq!(
            conf.env_pairs().collect::<Vec<_>>(),
            vec![("TZ", None), ("RUST_LOG", Some("debug"))]
        );

        conf.env.push("1BAD=x".to_owned());
        assert!(resolve(&mut conf).is_err());
    }

    #[test]
    fn pid_write_failure_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cradle.pid");

        let err = write_pid(&path).unwrap_err();

        assert!(matches!(err, CoreError::Io { .. }));
        assert!(err.to_string().contains(&path.display().to_string()), "{err}");
    }

    #[test]
    fn pid_file_holds_the_process_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cradle.pid");

        write_pid(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), format!("{}\n", std::process::id()));
    }
}
