//! The tokio runtime the daemon runs its main hooks and control loop on.
//!
//! The runtime is built only after the init hooks succeed, because its size
//! comes from the core module's `worker_threads` directive.

use anyhow::{Context, Result};
use cradle_core::CoreConf;
use std::thread::available_parallelism;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Worker threads when neither the document nor the hardware says otherwise.
const DEFAULT_WORKER_THREADS: usize = 4;
/// The default stack size for threads (3 `MiB`).
const DEFAULT_STACK_SIZE: usize = 3 * 1024 * 1024;
/// Minimum allowed stack size (1 `MiB`).
const MIN_STACK_SIZE: usize = 1024 * 1024;
/// Maximum allowed stack size (16 `MiB`).
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
/// How long an idle thread stays alive.
const THREAD_KEEP_ALIVE: Duration = Duration::from_secs(60);
const THREAD_NAME: &str = "cradle-worker";

/// Configuration for the tokio runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: available_parallelism()
                .map_or(DEFAULT_WORKER_THREADS, std::num::NonZero::get),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: THREAD_NAME.to_owned(),
            thread_keep_alive: THREAD_KEEP_ALIVE,
        }
    }
}

impl RuntimeConfig {
    /// Sizes the runtime from the core settings of an initialized cycle.
    #[must_use]
    pub fn from_core(conf: Option<&CoreConf>) -> Self {
        match conf {
            Some(conf) => Self::default().with_worker_threads(conf.worker_threads),
            None => Self::default(),
        }
    }

    #[must_use = "Customize the number of worker threads for the runtime"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, cradle_core::MAX_WORKER_THREADS);
        self
    }

    #[must_use = "Customize the stack size for worker threads"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use = "Customize the thread name"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.thread_name = if name.trim().is_empty() { THREAD_NAME.to_owned() } else { name };
        self
    }
}

/// Builds a multi-threaded runtime with I/O and timers enabled.
///
/// # Errors
/// Returns an error if the OS refuses to create the runtime threads.
pub fn build(config: &RuntimeConfig) -> Result<Runtime> {
    debug!(config = ?config, "Building tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .context("Failed to initialize runtime")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_threads_are_clamped() {
        assert_eq!(RuntimeConfig::default().with_worker_threads(0).worker_threads, 1);
        assert_eq!(
            RuntimeConfig::default().with_worker_threads(100_000).worker_threads,
            cradle_core::MAX_WORKER_THREADS
        );
    }

    #[test]
    fn stack_size_is_clamped() {
        assert_eq!(RuntimeConfig::default().with_stack_size(100).stack_size, MIN_STACK_SIZE);
        assert_eq!(
            RuntimeConfig::default().with_stack_size(100 * 1024 * 1024).stack_size,
            MAX_STACK_SIZE
        );
    }

    #[test]
    fn blank_thread_name_falls_back() {
        assert_eq!(RuntimeConfig::default().with_thread_name("  ").thread_name, THREAD_NAME);
    }

    #[test]
    fn core_settings_size_the_runtime() {
        let conf = CoreConf { worker_threads: 3, ..CoreConf::default() };
        assert_eq!(RuntimeConfig::from_core(Some(&conf)).worker_threads, 3);
        assert_eq!(RuntimeConfig::from_core(None), RuntimeConfig::default());
    }

    #[test]
    fn runtime_runs_a_future() {
        let runtime = build(&RuntimeConfig::default().with_worker_threads(1)).expect("runtime");
        assert_eq!(runtime.block_on(async { 2 + 2 }), 4);
    }
}
