#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the GEDX workspace.
//!
//! * [`macro@model_type`] attaches static model metadata (namespace, structural name, wire
//!   wrapper, preferred prefix) to a serde model so the name registry can be populated from
//!   an explicit table instead of runtime introspection.
//! * [`macro@gedx_error`] turns an enum into a context-carrying error type.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! gedx-derive = { path = "../infra/derive" }
//! ```
//!
//! Examples below are `ignore`d because they need the consuming crates in scope.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro declaring a type as a GEDX model type.
///
/// Implements `gedx_domain::ModelType` for the annotated struct or enum and fills in the
/// serde boilerplate every wire model shares.
///
/// # Arguments
///
/// * `namespace = "..."` - **required**, the namespace the type lives in.
/// * `name = "..."` - structural name; defaults to the decapitalized type name.
/// * `wrapper = "..."` - local name of the wire property wrapping this type. Only types
///   declaring a wrapper get a canonical wire name in the registry.
/// * `prefix = "..."` - preferred prefix for `namespace` in prefix-based formats.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug`, `Serialize` and `Deserialize` when missing.
/// * **Serde Policy**: `rename_all = "camelCase"` unless the type sets its own.
///
/// # Example
///
/// ```rust,ignore
/// use gedx_derive::model_type;
///
/// #[model_type(namespace = "http://example.org/ns/", wrapper = "notes", prefix = "ex")]
/// pub struct Note {
///     pub text: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn model_type(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::model::expand_model_type(args.into(), input).into()
}

/// A high-level attribute macro for defining crate error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait adding `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants holding a `source` field
///   (or a field marked `#[source]`/`#[from]`), enabling the `?` operator.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant exists.
///
/// # Requirements
///
/// 1. Applied to an **enum** with named-field variants only.
/// 2. Context-carrying variants declare `context: Option<Cow<'static, str>>`.
/// 3. Variants with a source field must also carry a context field.
///
/// # Example
///
/// ```rust,ignore
/// use gedx_derive::gedx_error;
/// use std::borrow::Cow;
///
/// #[gedx_error]
/// pub enum CodecError {
///     #[error("JSON error{}: {source}", format_context(.context))]
///     Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal codec error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn gedx_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
