//! The module kernel.
//!
//! Modules declare directives in command tables and register with a
//! [`registry::Registry`]. A [`cycle::Cycle`] owns one configuration structure per
//! module; [`dispatch::dispatch`] routes a parsed [`document::Document`] into those
//! structures and [`lifecycle`] runs the modules' hooks afterwards.
//!
//! ```rust
//! use cradle_kernel::prelude::*;
//!
//! #[cradle_derive::module_conf]
//! pub struct DemoConf {
//!     pub enabled: bool,
//! }
//!
//! let module = Module::builder("demo")
//!     .conf::<DemoConf>()
//!     .command(Command::new(
//!         "enabled",
//!         CommandType::MAIN,
//!         setter::flag::<DemoConf>("enabled", |c| &mut c.enabled),
//!     ))
//!     .build();
//!
//! let registry = Registry::builder().with(module)?.seal();
//! let mut cycle = Cycle::new(registry);
//! let doc = Document::parse_str("enabled: true", Format::Yaml)?;
//! dispatch(&mut cycle, doc.root())?;
//!
//! assert_eq!(cycle.conf_of::<DemoConf>("demo"), Some(&DemoConf { enabled: true }));
//! # Ok::<(), KernelError>(())
//! ```

#[cfg(test)]
extern crate self as cradle_kernel;

pub mod command;
pub mod config;
pub mod cycle;
pub mod dispatch;
pub mod document;
mod error;
pub mod lifecycle;
pub mod module;
pub mod prelude;
pub mod registry;
pub mod setter;

pub use cradle_domain as domain;
pub use error::{KernelError, KernelErrorExt};
