use std::borrow::Cow;

/// A specialized [`LogError`] enum of this crate.
#[cradle_derive::cradle_error]
pub enum LogError {
    /// The logger refused the level or filter.
    #[error("Log module logger error{}: {source}", format_context(.context))]
    Logger { source: cradle_logger::LoggerError, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal log module error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
