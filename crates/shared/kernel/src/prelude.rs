pub use crate::command::{Command, CommandTable};
pub use crate::cycle::{Cycle, CycleState};
pub use crate::dispatch::dispatch;
pub use crate::document::{Document, Format};
pub use crate::error::KernelError;
pub use crate::lifecycle;
pub use crate::module::{Hook, Module};
pub use crate::registry::Registry;
pub use crate::setter::{self, Binding};
pub use cradle_domain::registry::ModuleConf;
pub use cradle_domain::{CommandType, ModuleType, Status, Value, ValueKind};
