//! # Daemon
//!
//! Wires the kernel into a running process:
//!
//! 1. bootstrap configuration and logger,
//! 2. module registry from the `cradle` facade,
//! 3. directive document into a fresh cycle, then the init hooks,
//! 4. a tokio runtime sized by the core module's `worker_threads`,
//! 5. the main hooks, then the control loop until SIGINT or SIGTERM.
//!
//! SIGHUP reloads the document into a fresh cycle. A document that fails to load
//! or start leaves the running cycle and its log filter in place.

pub mod control;
pub mod runtime;

pub use crate::control::Control;

use anyhow::{Context, Result};
use cradle::domain::config::{BootstrapConfig, LogConfig};
use cradle::kernel::cycle::Cycle;
use cradle::kernel::lifecycle;
use cradle::kernel::registry::Registry;
use cradle_channel::{Channel, DEFAULT_CAPACITY};
use cradle_core::CoreConf;
use cradle_event::EventConf;
use cradle_logger::Logger;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Installs the global logger described by the bootstrap configuration.
///
/// # Errors
/// Fails on an unknown level name or if a subscriber is already installed.
pub fn init_logger(config: &LogConfig) -> Result<Logger> {
    let level = cradle_logger::parse_level(&config.level)?;
    let builder =
        Logger::builder().name(env!("CARGO_PKG_NAME")).console(config.console).level(level);

    let logger = match &config.path {
        Some(path) => {
            let builder = builder.path(path).max_files(config.max_files);
            if config.json { builder.json().init()? } else { builder.init()? }
        },
        None => builder.init()?,
    };
    Ok(logger)
}

/// A builder for configuring and creating a [`Daemon`].
#[derive(Debug, Default)]
pub struct DaemonBuilder {
    config: Option<BootstrapConfig>,
    document: Option<PathBuf>,
    registry: Option<Arc<Registry>>,
}

impl DaemonBuilder {
    /// Sets the bootstrap configuration.
    #[must_use]
    pub fn config(mut self, config: BootstrapConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the document path of the bootstrap configuration.
    #[must_use]
    pub fn document(mut self, path: impl Into<PathBuf>) -> Self {
        self.document = Some(path.into());
        self
    }

    /// Uses `registry` instead of the facade's built-in modules.
    #[must_use]
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Loads the document and runs the init hooks.
    ///
    /// # Errors
    /// Returns an error if the registry cannot be assembled, the document is
    /// invalid, or an init hook fails.
    pub fn build(self) -> Result<Daemon> {
        let config = self.config.unwrap_or_default();
        let document = self.document.unwrap_or(config.document.path);
        let registry = match self.registry {
            Some(registry) => registry,
            None => cradle::registry().context("Failed to assemble the module registry")?,
        };

        let cycle = configure(&registry, &document)?;
        Ok(Daemon { registry, document, cycle })
    }
}

/// A configured process, ready to run.
#[derive(Debug)]
pub struct Daemon {
    registry: Arc<Registry>,
    document: PathBuf,
    cycle: Cycle,
}

impl Daemon {
    #[must_use]
    pub fn builder() -> DaemonBuilder {
        DaemonBuilder::default()
    }

    /// The cycle currently in effect.
    #[must_use]
    pub const fn cycle(&self) -> &Cycle {
        &self.cycle
    }

    #[must_use]
    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Time granted to tasks spawned by modules once the control loop stops.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        CoreConf::of(&self.cycle).map_or(
            Duration::from_secs(cradle_core::DEFAULT_SHUTDOWN_TIMEOUT),
            CoreConf::shutdown_timeout,
        )
    }

    /// Buffer size of each direction of the control channel.
    #[must_use]
    pub fn channel_capacity(&self) -> usize {
        EventConf::of(&self.cycle)
            .map(|conf| conf.channel_capacity)
            .filter(|&capacity| capacity > 0)
            .unwrap_or(DEFAULT_CAPACITY)
    }

    /// Builds the runtime and blocks on [`Daemon::start`] and [`Daemon::serve`].
    ///
    /// # Errors
    /// Returns an error if the runtime cannot be built, a main hook fails, or the
    /// control channel cannot be created.
    pub fn run(mut self) -> Result<()> {
        let config = runtime::RuntimeConfig::from_core(CoreConf::of(&self.cycle));
        let grace = self.shutdown_timeout();
        let runtime = runtime::build(&config)?;

        info!(worker_threads = config.worker_threads, "Runtime started");

        runtime.block_on(async move {
            self.start()?;

            let (signals, control) = Channel::pair(self.channel_capacity())?;
            let listener = tokio::spawn(async move {
                if let Err(err) = control::listen(signals).await {
                    error!(error = %format!("{err:#}"), "Signal listener failed");
                }
            });

            self.serve(control).await;
            listener.abort();
            Ok::<_, anyhow::Error>(())
        })?;

        runtime.shutdown_timeout(grace);
        info!("Stopped");
        Ok(())
    }

    /// Runs the main hooks of the current cycle. Must be called inside a tokio runtime
    /// when modules spawn tasks.
    ///
    /// # Errors
    /// Returns an error if a main hook fails.
    pub fn start(&mut self) -> Result<()> {
        lifecycle::run_modules(&mut self.cycle).context("Failed to start modules")?;
        info!(document = %self.document.display(), "Modules running");
        Ok(())
    }

    /// Handles control messages until a shutdown arrives or every sender is gone.
    pub async fn serve(&mut self, mut control: Channel<Control>) {
        loop {
            match control.pull().await {
                Some(Control::Reload) => self.reload(),
                Some(Control::Shutdown { signal }) => {
                    info!(signal, "Shutting down");
                    break;
                },
                None => {
                    warn!("Signal listener is gone; shutting down");
                    break;
                },
            }
        }
        self.remove_pid();
    }

    /// Loads the document into a fresh cycle and swaps it in once its init and main
    /// hooks succeed.
    ///
    /// A rejected cycle leaves the running one in effect: the log filter is put
    /// back and a pid file written only by the rejected cycle is removed. After a
    /// swap, the previous pid file is removed when the path changed.
    pub fn reload(&mut self) {
        let filter = cradle_logger::current_filter().ok();

        let mut cycle = match configure(&self.registry, &self.document) {
            Ok(cycle) => cycle,
            Err(err) => return reject(&err),
        };
        if let Err(err) = lifecycle::run_modules(&mut cycle).context("Failed to start modules") {
            if let Some(stray) = pid_path(&cycle).filter(|&path| pid_path(&self.cycle) != Some(path)) {
                remove_pid_file(stray);
            }
            if let Some(filter) = filter {
                restore_filter(&filter);
            }
            return reject(&err);
        }

        let previous = std::mem::replace(&mut self.cycle, cycle);
        if let Some(old) = pid_path(&previous).filter(|&path| pid_path(&self.cycle) != Some(path)) {
            remove_pid_file(old);
        }
        info!(document = %self.document.display(), "Configuration reloaded");
    }

    fn remove_pid(&self) {
        if let Some(path) = pid_path(&self.cycle) {
            remove_pid_file(path);
        }
    }
}

fn reject(err: &anyhow::Error) {
    error!(error = %format!("{err:#}"), "Reload rejected; keeping the running configuration");
}

fn restore_filter(filter: &str) {
    if let Err(err) = cradle_logger::reconfigure(filter) {
        warn!(error = %err, filter, "Failed to restore the log filter");
    }
}

fn pid_path(cycle: &Cycle) -> Option<&str> {
    CoreConf::of(cycle).map(|conf| conf.pid.as_str()).filter(|path| !path.is_empty())
}

fn remove_pid_file(path: &str) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path, "Pid file removed"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path, "Pid file already gone");
        },
        Err(err) => warn!(path, error = %err, "Failed to remove pid file"),
    }
}

/// Loads `document` into a fresh cycle and runs the init hooks.
fn configure(registry: &Arc<Registry>, document: &Path) -> Result<Cycle> {
    let cycle = cradle::check(registry, document)
        .with_context(|| format!("Configuration in {} is invalid", document.display()))?;
    info!(document = %document.display(), "Configuration is valid");
    Ok(cycle)
}
