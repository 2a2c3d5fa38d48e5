//! # Logger
//!
//! Installs the process-wide `tracing` subscriber of cradle binaries.
//!
//! Logging comes up in two steps. The daemon installs the subscriber from its
//! bootstrap settings before the directive document is read, so a rejected
//! document is still reported. Once the document is applied, the `log` module
//! swaps the level filter with [`reconfigure`]; the output layers stay as they are.
//!
//! Output goes to the console, to rolling files fed by a background writer, or
//! to both. `RUST_LOG` decides the starting filter unless the builder was given
//! one with [`LoggerBuilder::env_filter`].
//!
//! ## Example
//!
//! ```rust
//! # use cradle_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("my-app")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//!
//! cradle_logger::reconfigure("cradle_kernel=trace,info").unwrap();
//! assert!(cradle_logger::current_filter().unwrap().contains("cradle_kernel=trace"));
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, reload};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// The filter sits directly on the registry; output layers sit on top of it.
type Filtered = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type OutputLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// Swaps the filter of the installed subscriber. Set once, by the first successful init.
static FILTER: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

#[derive(Debug)]
struct Settings {
    console: bool,
    dir: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            console: true,
            dir: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

impl Settings {
    fn validate(&self, name: &str) -> Result<(), LoggerError> {
        if name.trim().is_empty() {
            return Err(invalid("Logger name cannot be empty"));
        }
        if self.max_files == 0 {
            return Err(invalid("max_files must be greater than zero"));
        }
        if !self.console && self.dir.is_none() {
            return Err(invalid("No output enabled; turn on the console or give a log directory"));
        }
        Ok(())
    }

    fn starting_filter(&self) -> Result<EnvFilter, LoggerError> {
        match &self.env_filter {
            Some(filter) => parse_filter(filter),
            None => Ok(EnvFilter::builder()
                .with_default_directive(self.level.into())
                .from_env_lossy()),
        }
    }

    fn file_layer(&self, name: &str, dir: &Path) -> Result<(OutputLayer, WorkerGuard), LoggerError> {
        fs::create_dir_all(dir).map_err(|e| LoggerError::Internal {
            message: e.to_string().into(),
            context: Some(format!("Failed to create log directory {}", dir.display()).into()),
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(self.rotation.clone())
            .filename_prefix(name)
            .filename_suffix(LOG_FILE_SUFFIX)
            .max_log_files(self.max_files)
            .build(dir)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let plain = layer().with_writer(writer).with_ansi(false);
        let output = if self.json { plain.json().boxed() } else { plain.boxed() };
        Ok((output, guard))
    }
}

/// No name given yet.
#[derive(Debug)]
pub struct Unnamed;
/// Files are prefixed with this name.
#[derive(Debug)]
pub struct Named(String);
/// No log directory given yet.
#[derive(Debug)]
pub struct NoFiles;
/// Logs also go to rolling files; file-only options become available.
#[derive(Debug)]
pub struct WithFiles;

mod private {
    pub trait Sealed {}
}
impl Sealed for Unnamed {}
impl Sealed for Named {}
impl Sealed for NoFiles {}
impl Sealed for WithFiles {}

/// Collects the subscriber settings. `init` exists only once a name is set, and
/// the file options only once a directory is set.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = Unnamed, F: Sealed = NoFiles> {
    settings: Settings,
    name: N,
    files: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<Unnamed, F> {
    /// Names the process; the name prefixes rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, F> {
        LoggerBuilder { settings: self.settings, name: Named(name.into()), files: PhantomData }
    }
}

impl LoggerBuilder<Named, WithFiles> {
    /// How many rotated files are kept.
    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }

    #[must_use]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    /// Writes one JSON object per event to the files. The console stays human-readable.
    #[must_use]
    pub const fn json(mut self) -> Self {
        self.settings.json = true;
        self
    }
}

impl<F: Sealed> LoggerBuilder<Named, F> {
    /// Default level when neither `RUST_LOG` nor an explicit filter says otherwise.
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Starts with `filter` (`RUST_LOG` syntax) instead of reading `RUST_LOG`.
    /// A malformed filter makes [`LoggerBuilder::init`] fail.
    #[must_use]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.settings.env_filter = Some(filter.into());
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Also writes rolling files into `dir`, created on init if missing.
    pub fn path(self, dir: impl Into<PathBuf>) -> LoggerBuilder<Named, WithFiles> {
        let mut settings = self.settings;
        settings.dir = Some(dir.into());
        LoggerBuilder { settings, name: self.name, files: PhantomData }
    }

    /// Installs the subscriber for the whole process.
    ///
    /// Keep the returned [`Logger`] alive until exit: it owns the background file
    /// writer, and dropping it flushes and stops that writer.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`,
    /// no output or a malformed filter; [`LoggerError::Subscriber`] if a
    /// subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { settings, name: Named(name), .. } = self;
        settings.validate(&name)?;

        let (filter, handle) = reload::Layer::new(settings.starting_filter()?);

        let mut outputs: Vec<OutputLayer> = Vec::new();
        if settings.console {
            outputs.push(layer().compact().with_ansi(true).boxed());
        }
        let guard = match &settings.dir {
            Some(dir) => {
                let (output, guard) = settings.file_layer(&name, dir)?;
                outputs.push(output);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(filter).with(outputs).try_init()?;
        FILTER.set(handle).map_err(|_| LoggerError::from("filter handle already registered"))?;

        tracing::debug!(name = %name, files = settings.dir.is_some(), "Logger installed");
        Ok(Logger { guard })
    }
}

/// The installed logger. Dropping it flushes pending file output.
#[must_use = "Dropping the logger stops the background file writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: Settings::default(), name: Unnamed, files: PhantomData }
    }

    /// The background writer's guard, present when logging to files.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Flushing log files");
        }
    }
}

/// Replaces the filter of the installed subscriber.
///
/// `filter` uses the `RUST_LOG` syntax: a bare level (`"debug"`) or a list of
/// directives (`"cradle_kernel=trace,warn"`). The process environment is not
/// consulted.
///
/// # Errors
/// [`LoggerError::NotInstalled`] before [`LoggerBuilder::init`] succeeded,
/// [`LoggerError::InvalidConfiguration`] for a malformed filter and
/// [`LoggerError::Reload`] if the subscriber is gone.
pub fn reconfigure(filter: &str) -> Result<(), LoggerError> {
    let handle = installed()?;
    let parsed = parse_filter(filter)?;
    handle.reload(parsed).context("Failed to swap the level filter")?;
    tracing::info!(filter, "Log filter reconfigured");
    Ok(())
}

/// The active filter in `RUST_LOG` syntax, suitable for a later [`reconfigure`].
///
/// # Errors
/// [`LoggerError::NotInstalled`] before [`LoggerBuilder::init`] succeeded.
pub fn current_filter() -> Result<String, LoggerError> {
    installed()?.with_current(ToString::to_string).context("Failed to read the level filter")
}

/// Checks a filter without installing it.
///
/// # Errors
/// [`LoggerError::InvalidConfiguration`] for a malformed filter.
pub fn validate_filter(filter: &str) -> Result<(), LoggerError> {
    parse_filter(filter).map(drop)
}

/// Whether a logger has been installed in this process.
#[must_use]
pub fn is_installed() -> bool {
    FILTER.get().is_some()
}

/// Parses a level name such as `"info"` or `"off"`.
///
/// # Errors
/// [`LoggerError::InvalidConfiguration`] for anything else.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    level.trim().parse().map_err(|_| invalid(format!("Unknown log level '{level}'")))
}

fn installed() -> Result<&'static reload::Handle<EnvFilter, Registry>, LoggerError> {
    FILTER.get().ok_or(LoggerError::NotInstalled { context: None })
}

fn parse_filter(filter: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::builder()
        .parse(filter)
        .map_err(|e| invalid(format!("Invalid filter '{filter}': {e}")))
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> LoggerError {
    LoggerError::InvalidConfiguration { message: message.into(), context: None }
}
