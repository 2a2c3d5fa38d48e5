//! Log module: narrows or widens the log filter once the document is loaded.
//!
//! `log_level` sets the default level, `log_filter` adds per-target directives
//! in the `RUST_LOG` syntax. The init hook only checks them. The main hook
//! installs them through [`cradle_logger::reconfigure`], so a cycle that fails
//! init never touches the live filter.

mod error;

pub use crate::error::{LogError, LogErrorExt};

use cradle_kernel::prelude::*;
use cradle_logger::LoggerError;
use tracing::{debug, error};

/// Registered name of the module.
pub const NAME: &str = "log";

#[cradle_derive::module_conf]
pub struct LogConf {
    pub log_level: String,
    pub log_filter: String,
}

impl LogConf {
    #[must_use]
    pub fn of(cycle: &Cycle) -> Option<&Self> {
        cycle.conf_of::<Self>(NAME)
    }

    /// The filter to install, or `None` when neither directive was given.
    ///
    /// # Errors
    /// [`LogError::Logger`] for an unknown level name or malformed directives.
    pub fn filter(&self) -> Result<Option<String>, LogError> {
        let level = self.log_level.trim();
        let directives = self.log_filter.trim();
        if !level.is_empty() {
            cradle_logger::parse_level(level).context("log_level")?;
        }
        if !directives.is_empty() {
            cradle_logger::validate_filter(directives).context("log_filter")?;
        }

        Ok(match (level.is_empty(), directives.is_empty()) {
            (true, true) => None,
            (false, true) => Some(level.to_owned()),
            (true, false) => Some(directives.to_owned()),
            (false, false) => Some(format!("{level},{directives}")),
        })
    }
}

#[must_use]
pub fn module() -> Module {
    Module::builder(NAME)
        .module_type(ModuleType::CONFIG)
        .conf::<LogConf>()
        .command(Command::new(
            "log_level",
            CommandType::MAIN,
            setter::string::<LogConf>("log_level", |c| &mut c.log_level),
        ))
        .command(Command::new(
            "log_filter",
            CommandType::MAIN,
            setter::string::<LogConf>("log_filter", |c| &mut c.log_filter),
        ))
        .init(on_init)
        .main(on_main)
        .build()
}

fn on_init(cycle: &mut Cycle, module: &Module) -> Status {
    let Some(conf) = cycle.conf::<LogConf>(module) else {
        return Status::Error;
    };
    match conf.filter() {
        Ok(Some(filter)) => {
            debug!(%filter, "Log filter accepted");
            Status::Ok
        },
        Ok(None) => Status::Ignore,
        Err(err) => {
            error!(error = %err, "Log module rejected its configuration");
            Status::Error
        },
    }
}

fn on_main(cycle: &mut Cycle, module: &Module) -> Status {
    let Some(conf) = cycle.conf::<LogConf>(module) else {
        return Status::Error;
    };
    match apply(conf) {
        Ok(true) => Status::Ok,
        Ok(false) => Status::Ignore,
        Err(LogError::Logger { source: LoggerError::NotInstalled { .. }, .. }) => {
            debug!("No logger installed; log directives have nothing to act on");
            Status::Ignore
        },
        Err(err) => {
            error!(error = %err, "Failed to install the log filter");
            Status::Error
        },
    }
}

/// Installs the configured filter. `Ok(false)` when there was nothing to apply.
///
/// # Errors
/// [`LogError::Logger`] when the filter is invalid or no logger is installed.
pub fn apply(conf: &LogConf) -> Result<bool, LogError> {
    let Some(filter) = conf.filter()? else {
        return Ok(false);
    };
    cradle_logger::reconfigure(&filter)?;
    Ok(true)
}
