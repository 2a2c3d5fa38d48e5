//! Facade crate for the cradle kernel and its built-in modules.
//! Re-exports domain/kernel primitives and assembles the registry of enabled modules.
//! Keep this crate thin: it should compose other crates, not implement dispatch logic.
//!
//! ## Usage
//! - Add `cradle` with the desired module features (`core`/`event`/`log`, all on by default).
//! - Call [`registry`] once at startup, then [`load`] a document into a fresh cycle.

pub use cradle_domain as domain;
pub use cradle_kernel as kernel;

use cradle_kernel::KernelErrorExt;
use cradle_kernel::prelude::*;
use cradle_kernel::registry::RegistryBuilder;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Module registry for runtime introspection.
pub mod modules {
    #[cfg(feature = "core")]
    pub use cradle_core as core;
    #[cfg(feature = "event")]
    pub use cradle_event as event;
    #[cfg(feature = "log")]
    pub use cradle_log as log;

    /// Build-time enabled modules (by Cargo feature), in registration order.
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "core")]
        "core",
        #[cfg(feature = "event")]
        "event",
        #[cfg(feature = "log")]
        "log",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Registers every enabled built-in module plus `extra`, in that order, and seals
/// the registry.
///
/// # Errors
/// [`KernelError::DuplicateRegistration`] if an extra module reuses a name.
pub fn registry_with(extra: impl IntoIterator<Item = Module>) -> Result<Arc<Registry>, KernelError> {
    let mut builder = builtin()?;
    for module in extra {
        builder.register(module)?;
    }
    let registry = builder.seal();
    info!(modules = registry.len(), "Module registry sealed");
    Ok(registry)
}

/// The registry of enabled built-in modules.
///
/// # Errors
/// Only if two built-in modules collide, which is a build defect.
pub fn registry() -> Result<Arc<Registry>, KernelError> {
    registry_with(std::iter::empty())
}

#[allow(unused_mut)]
fn builtin() -> Result<RegistryBuilder, KernelError> {
    let mut builder = Registry::builder();

    // Core (opens the events block)
    #[cfg(feature = "core")]
    builder.register(modules::core::module())?;

    // Event
    #[cfg(feature = "event")]
    builder.register(modules::event::module())?;

    // Log
    #[cfg(feature = "log")]
    builder.register(modules::log::module())?;

    Ok(builder)
}

/// Reads the document at `path` and applies it to a fresh cycle.
///
/// # Errors
/// Reading, parsing or dispatch errors; the returned error carries the path.
pub fn load(registry: &Arc<Registry>, path: impl AsRef<Path>) -> Result<Cycle, KernelError> {
    let path = path.as_ref();
    let document = Document::load(path)?;
    let mut cycle = Cycle::new(Arc::clone(registry));
    dispatch(&mut cycle, document.root()).context(path.display().to_string())?;
    Ok(cycle)
}

/// [`load`] followed by the init hooks: everything a configuration test needs.
///
/// # Errors
/// See [`load`] and [`lifecycle::init_modules`].
pub fn check(registry: &Arc<Registry>, path: impl AsRef<Path>) -> Result<Cycle, KernelError> {
    let mut cycle = load(registry, path)?;
    lifecycle::init_modules(&mut cycle)?;
    Ok(cycle)
}
