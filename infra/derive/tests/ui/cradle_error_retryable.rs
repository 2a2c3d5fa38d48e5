use cradle_derive::cradle_error;
use std::borrow::Cow;

#[cradle_error]
pub enum QueueError {
    #[retryable]
    #[error("Queue full{}: {message}", format_context(.context))]
    Full { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Queue closed")]
    Closed {},
}

fn main() {
    assert!(QueueError::Full { message: "upstream".into(), context: None }.retryable());
    assert!(!QueueError::Closed {}.retryable());
}
