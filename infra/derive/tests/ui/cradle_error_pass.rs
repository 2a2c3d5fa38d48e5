use cradle_derive::cradle_error;
use std::borrow::Cow;

#[cradle_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn open() -> Result<(), DemoError> {
    Err(std::io::Error::other("boom")).context("opening demo file")
}

fn main() {
    let err = open().unwrap_err();
    assert!(err.to_string().contains("opening demo file"));
    assert!(!err.retryable());

    let internal: DemoError = "fallback".into();
    assert!(matches!(internal, DemoError::Internal { .. }));
}
