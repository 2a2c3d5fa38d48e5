//! Event module: directives that are only legal inside the `events` block
//! opened by the core module.

mod error;

pub use crate::error::{EventError, EventErrorExt};

use cradle_kernel::prelude::*;
use tracing::{error, info};

/// Registered name of the module.
pub const NAME: &str = "event";

pub const DEFAULT_WORKER_CONNECTIONS: usize = 512;
pub const MAX_WORKER_CONNECTIONS: usize = 65_536;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[cradle_derive::module_conf]
pub struct EventConf {
    /// Connections a worker may hold at once; 0 means the default.
    pub worker_connections: usize,
    /// Accept every pending connection on wake-up instead of one.
    pub multi_accept: bool,
    /// Buffer size of each direction of the control channel; 0 means the default.
    pub channel_capacity: usize,
}

impl EventConf {
    #[must_use]
    pub fn of(cycle: &Cycle) -> Option<&Self> {
        cycle.conf_of::<Self>(NAME)
    }
}

#[must_use]
pub fn module() -> Module {
    Module::builder(NAME)
        .module_type(ModuleType::EVENT)
        .conf::<EventConf>()
        .command(Command::new(
            "worker_connections",
            CommandType::EVENT,
            setter::number::<EventConf, usize>("worker_connections", |c| {
                &mut c.worker_connections
            }),
        ))
        .command(Command::new(
            "multi_accept",
            CommandType::EVENT,
            setter::flag::<EventConf>("multi_accept", |c| &mut c.multi_accept),
        ))
        .command(Command::new(
            "channel_capacity",
            CommandType::EVENT,
            setter::number::<EventConf, usize>("channel_capacity", |c| &mut c.channel_capacity),
        ))
        .init(on_init)
        .build()
}

fn on_init(cycle: &mut Cycle, module: &Module) -> Status {
    let Some(conf) = cycle.conf_mut::<EventConf>(module) else {
        return Status::Error;
    };
    if let Err(err) = resolve(conf) {
        error!(error = %err, "Event module rejected its configuration");
        return Status::Error;
    }
    info!(
        worker_connections = conf.worker_connections,
        multi_accept = conf.multi_accept,
        channel_capacity = conf.channel_capacity,
        "Event module initialized"
    );
    Status::Ok
}

/// Validates the configured values and fills in defaults.
///
/// # Errors
/// [`EventError::Config`] when `worker_connections` exceeds [`MAX_WORKER_CONNECTIONS`].
pub fn resolve(conf: &mut EventConf) -> Result<(), EventError> {
    if conf.worker_connections > MAX_WORKER_CONNECTIONS {
        return Err(EventError::Config {
            message: format!(
                "worker_connections is {}, at most {MAX_WORKER_CONNECTIONS} are allowed",
                conf.worker_connections
            )
            .into(),
            context: None,
        });
    }
    if conf.worker_connections == 0 {
        conf.worker_connections = DEFAULT_WORKER_CONNECTIONS;
    }
    if conf.channel_capacity == 0 {
        conf.channel_capacity = DEFAULT_CHANNEL_CAPACITY;
    }
    Ok(())
}
