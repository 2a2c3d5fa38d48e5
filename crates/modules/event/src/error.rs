use std::borrow::Cow;

/// A specialized [`EventError`] enum of this crate.
#[cradle_derive::cradle_error]
pub enum EventError {
    /// A directive value the event module cannot work with.
    #[error("Event config error{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal event error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
