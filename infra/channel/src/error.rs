use cradle_domain::Status;
use std::borrow::Cow;

/// Errors that can occur on a control channel.
#[cradle_derive::cradle_error]
pub enum ChannelError {
    /// The peer's buffer is full; the message was not queued.
    #[retryable]
    #[error("Channel full{}: {message}", format_context(.context))]
    Full { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Nothing is waiting in this end's buffer.
    #[retryable]
    #[error("Channel empty{}: {message}", format_context(.context))]
    Empty { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The other end has been dropped.
    #[error("Channel closed{}: {message}", format_context(.context))]
    Closed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Capacity must be greater than zero.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ChannelError {
    /// [`Status::Again`] for conditions that clear up on their own, [`Status::Error`] otherwise.
    #[must_use]
    pub const fn status(&self) -> Status {
        if self.retryable() { Status::Again } else { Status::Error }
    }
}
