//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O or dispatch logic, just the shapes the kernel and modules share.

pub mod config;
pub mod flags;
pub mod registry;
pub mod status;
pub mod value;

pub use flags::{CommandType, ModuleType};
pub use status::{ConfigStatus, Status};
pub use value::{Mapping, Number, Scalar, Value, ValueKind};
