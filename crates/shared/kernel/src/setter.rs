//! Typed setters.
//!
//! A setter knows which field of which configuration structure it writes and
//! what kind of value it accepts. It is handed the opaque handle the kernel
//! keeps for the module and downcasts it back to the concrete type.

use crate::error::KernelError;
use cradle_domain::registry::ModuleConf;
use cradle_domain::{CommandType, Value, ValueKind};
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

type SetFn = dyn Fn(&Binding<'_>, &mut dyn ModuleConf) -> Result<(), KernelError> + Send + Sync;

/// The directive currently being applied: its name, value and owning module.
///
/// A binding only lives for one setter call.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    module: &'a str,
    directive: &'a str,
    value: &'a Value,
}

impl<'a> Binding<'a> {
    #[must_use]
    pub const fn new(module: &'a str, directive: &'a str, value: &'a Value) -> Self {
        Self { module, directive, value }
    }

    #[must_use]
    pub const fn module(&self) -> &'a str {
        self.module
    }

    #[must_use]
    pub const fn directive(&self) -> &'a str {
        self.directive
    }

    #[must_use]
    pub const fn value(&self) -> &'a Value {
        self.value
    }

    /// A [`KernelError::TypeMismatch`] for this binding.
    #[must_use]
    pub fn mismatch(&self, expected: ValueKind) -> KernelError {
        KernelError::TypeMismatch {
            directive: self.directive.to_owned().into(),
            expected,
            actual: self.value.kind(),
            context: None,
        }
    }

    /// A [`KernelError::InvalidValue`] for this binding.
    #[must_use]
    pub fn invalid(&self, message: impl Into<String>) -> KernelError {
        KernelError::InvalidValue {
            directive: self.directive.to_owned().into(),
            message: message.into().into(),
            context: None,
        }
    }
}

/// How a command acts on its value.
#[derive(Clone)]
pub enum Setter {
    /// Writes one field of the module's configuration structure.
    Field { field: &'static str, accepts: ValueKind, set: Arc<SetFn> },
    /// Dispatches the value, a nested mapping, with the command-type mask
    /// switched to the given one.
    Block(CommandType),
}

impl Setter {
    /// Name of the field written, or `None` for blocks.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Field { field, .. } => Some(field),
            Self::Block(_) => None,
        }
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { field, accepts, .. } => {
                f.debug_struct("Field").field("field", field).field("accepts", accepts).finish()
            },
            Self::Block(mask) => f.debug_tuple("Block").field(mask).finish(),
        }
    }
}

fn field_setter<F>(field: &'static str, accepts: ValueKind, set: F) -> Setter
where
    F: Fn(&Binding<'_>, &mut dyn ModuleConf) -> Result<(), KernelError> + Send + Sync + 'static,
{
    Setter::Field { field, accepts, set: Arc::new(set) }
}

fn conf_mut<'c, C: ModuleConf>(
    binding: &Binding<'_>,
    conf: &'c mut dyn ModuleConf,
) -> Result<&'c mut C, KernelError> {
    conf.as_any_mut().downcast_mut::<C>().ok_or_else(|| KernelError::ConfMismatch {
        module: binding.module().to_owned().into(),
        expected: type_name::<C>(),
        context: None,
    })
}

/// Accepts a boolean and stores it in `slot`.
pub fn flag<C: ModuleConf>(field: &'static str, slot: fn(&mut C) -> &mut bool) -> Setter {
    field_setter(field, ValueKind::Bool, move |binding, conf| {
        let value = binding.value().as_bool().ok_or_else(|| binding.mismatch(ValueKind::Bool))?;
        *slot(conf_mut::<C>(binding, conf)?) = value;
        Ok(())
    })
}

/// Accepts a string and stores a copy of it in `slot`.
pub fn string<C: ModuleConf>(field: &'static str, slot: fn(&mut C) -> &mut String) -> Setter {
    field_setter(field, ValueKind::String, move |binding, conf| {
        let value = binding.value().as_str().ok_or_else(|| binding.mismatch(ValueKind::String))?;
        value.clone_into(slot(conf_mut::<C>(binding, conf)?));
        Ok(())
    })
}

/// Accepts an integer and stores it in `slot` when it fits the field's type.
///
/// Floats are a type mismatch; out-of-range integers are an invalid value.
pub fn number<C, T>(field: &'static str, slot: fn(&mut C) -> &mut T) -> Setter
where
    C: ModuleConf,
    T: TryFrom<i64> + 'static,
{
    field_setter(field, ValueKind::Integer, move |binding, conf| {
        let raw = binding.value().as_i64().ok_or_else(|| binding.mismatch(ValueKind::Integer))?;
        let value = T::try_from(raw)
            .map_err(|_| binding.invalid(format!("{raw} does not fit in {}", type_name::<T>())))?;
        *slot(conf_mut::<C>(binding, conf)?) = value;
        Ok(())
    })
}

/// A hand-written setter for fields no built-in kind covers.
///
/// The closure receives the binding and the typed structure; `accepts` is the
/// kind reported in diagnostics.
pub fn custom<C, F>(field: &'static str, accepts: ValueKind, set: F) -> Setter
where
    C: ModuleConf,
    F: Fn(&Binding<'_>, &mut C) -> Result<(), KernelError> + Send + Sync + 'static,
{
    field_setter(field, accepts, move |binding, conf| set(binding, conf_mut::<C>(binding, conf)?))
}

/// Opens a nested block whose directives are matched under `mask`.
#[must_use]
pub const fn block(mask: CommandType) -> Setter {
    Setter::Block(mask)
}
