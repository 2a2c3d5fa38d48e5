use std::borrow::Cow;

/// A specialized [`CoreError`] enum of this crate.
#[cradle_derive::cradle_error]
pub enum CoreError {
    /// A directive value the core module cannot work with.
    #[error("Core config error{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// Failure writing the pid file.
    #[error("Core IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal core error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
