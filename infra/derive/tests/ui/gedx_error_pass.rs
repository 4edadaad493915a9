use gedx_derive::gedx_error;
use std::borrow::Cow;

#[gedx_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Duplicate key{}: {key}", format_context(.context))]
    Duplicate { key: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err(std::io::Error::other("boom")).context("Reading marker")?;
    Ok(())
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.to_string(), "IO error (Reading marker): boom");

    let internal: DemoError = "oops".into();
    assert!(matches!(internal, DemoError::Internal { .. }));
}
