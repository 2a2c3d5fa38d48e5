//! Opaque per-module configuration handles.
//! The kernel owns one value per module and only hands it back through
//! downcasting, so it never needs to know the concrete layout.

use std::any::Any;
use std::fmt::Debug;

/// Marker trait for module configuration structures.
///
/// Implemented by `#[cradle_derive::module_conf]`; hand-written impls only need
/// to return `self` from both methods.
pub trait ModuleConf: Any + Debug + Send {
    /// Helper to allow downcasting from the trait object.
    fn as_any(&self) -> &dyn Any;

    /// Mutable counterpart of [`ModuleConf::as_any`], used by setters.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Creates a fresh configuration structure for one load.
pub type ConfFactory = fn() -> Box<dyn ModuleConf>;

/// Factory for any `Default` configuration structure.
#[must_use]
pub fn default_conf<C: ModuleConf + Default>() -> Box<dyn ModuleConf> {
    Box::new(C::default())
}
