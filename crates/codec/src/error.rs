//! # Codec Errors
//!
//! [`CodecError`] covers the fatal, data-shape failures of the codec. Recoverable
//! conditions (unreadable marker files, unknown content on non-extensible hosts) are
//! logged and never reach this type.

use std::borrow::Cow;

#[gedx_derive::gedx_error]
pub enum CodecError {
    /// Several items share a key while at least one of them declares the key unique.
    #[error(
        "Key uniqueness violation{}: {count} items share key '{key}' declared unique",
        format_context(.context)
    )]
    UniquenessViolation { key: String, count: usize, context: Option<Cow<'static, str>> },

    /// Keyed collection input that is not shaped as an object of keyed items.
    #[error("Malformed keyed input{}: {message}", format_context(.context))]
    MalformedKeyedInput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A wire name that cannot be turned into a qualified name.
    #[error("Invalid name{}: {message}", format_context(.context))]
    InvalidName { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A host serialized to something other than a JSON object.
    #[error("Expected a JSON object{}: {message}", format_context(.context))]
    NotAnObject { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure in `serde_json` while converting between values and types.
    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Failure while loading configuration.
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// Internal fallback for logic errors.
    #[error("Internal codec error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
