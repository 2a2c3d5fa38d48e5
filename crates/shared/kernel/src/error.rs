use crate::cycle::CycleState;
use cradle_domain::ValueKind;
use std::borrow::Cow;

/// Everything that can go wrong while loading a document into module
/// configuration structures or while running the module lifecycle.
#[cradle_derive::cradle_error]
pub enum KernelError {
    #[error("Unknown directive{}: `{directive}`", format_context(.context))]
    UnknownDirective { directive: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Type mismatch{}: `{directive}` expects {expected}, got {actual}", format_context(.context))]
    TypeMismatch {
        directive: Cow<'static, str>,
        expected: ValueKind,
        actual: ValueKind,
        context: Option<Cow<'static, str>>,
    },

    #[error("Invalid value{}: `{directive}`: {message}", format_context(.context))]
    InvalidValue {
        directive: Cow<'static, str>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unroutable value{}: a bare {kind} has no directive name", format_context(.context))]
    BareScalar { kind: ValueKind, context: Option<Cow<'static, str>> },

    #[error("Malformed document{}: {source}", format_context(.context))]
    MalformedDocument { source: serde_yaml::Error, context: Option<Cow<'static, str>> },

    #[error("Malformed JSON document{}: {source}", format_context(.context))]
    MalformedJson { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Duplicate registration{}: {message}", format_context(.context))]
    DuplicateRegistration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Configuration mismatch{}: module `{module}` does not own a {expected}", format_context(.context))]
    ConfMismatch {
        module: Cow<'static, str>,
        expected: &'static str,
        context: Option<Cow<'static, str>>,
    },

    #[error("Stale binding{}: setter for `{directive}` received `{bound}`", format_context(.context))]
    StaleBinding {
        directive: Cow<'static, str>,
        bound: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Invalid cycle state{}: cycle is {state}, expected {expected}", format_context(.context))]
    InvalidState { state: CycleState, expected: CycleState, context: Option<Cow<'static, str>> },

    #[error("Init failed{}: module `{module}`", format_context(.context))]
    InitFailed { module: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Main failed{}: module `{module}`", format_context(.context))]
    MainFailed { module: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Internal kernel error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl KernelError {
    /// The directive the error refers to, when there is one.
    #[must_use]
    pub fn directive(&self) -> Option<&str> {
        match self {
            Self::UnknownDirective { directive, .. }
            | Self::TypeMismatch { directive, .. }
            | Self::InvalidValue { directive, .. }
            | Self::StaleBinding { directive, .. } => Some(directive),
            _ => None,
        }
    }
}
