//! # GEDX Codec
//!
//! Open-content and keyed-collection serialization for GEDX models.
//!
//! The generic field mapping of a model is plain `serde`; this crate handles what sits on
//! top of it:
//!
//! * [`names`] - pure conversion between qualified names and flat wire property names.
//! * [`registry`] - the name registry: Rust types to canonical wire names, type
//!   identifiers and namespace prefixes, populated from a static [`Catalogue`] plus marker
//!   files and frozen into a cheap [`NameRegistry`] handle.
//! * [`extension`] - routes undeclared properties of a host into its extension storage
//!   and writes them back out.
//! * [`keyed`] - writes collections of [`Keyed`](gedx_domain::Keyed) items as objects
//!   keyed by item key.
//!
//! ## Example
//!
//! ```rust
//! use gedx_codec::{ExtensionCodec, RegistryBuilder};
//! use gedx_domain::{ExtensionData, ExtensionElement};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), gedx_codec::CodecError> {
//! let codec = ExtensionCodec::new(RegistryBuilder::new().build());
//!
//! let host: ExtensionData = codec.from_value(json!({ "tags": [{ "a": 1 }, { "a": 2 }] }))?;
//! assert_eq!(host.elements().len(), 2);
//! assert!(matches!(&host.elements()[0], ExtensionElement::Generic(g) if g.name.local_name() == "tags"));
//!
//! assert_eq!(codec.to_value(&host)?, json!({ "tags": [{ "a": 1 }, { "a": 2 }] }));
//! # Ok(())
//! # }
//! ```

pub mod config;
mod error;
pub mod extension;
pub mod keyed;
pub mod names;
pub mod registry;

pub use error::{CodecError, CodecErrorExt};
pub use extension::{Absorbed, ExtensionCodec, ExtensionDeserializer, ExtensionSerializer};
pub use gedx_domain as domain;
pub use registry::{Catalogue, NameRegistry, RegistryBuilder, TypeDescriptor};

pub mod prelude {
    pub use crate::config::RegistryConfig;
    pub use crate::error::{CodecError, CodecErrorExt};
    pub use crate::extension::ExtensionCodec;
    pub use crate::keyed::RawKeyedItem;
    pub use crate::registry::{Catalogue, NameRegistry, RegistryBuilder, TypeDescriptor};
    pub use gedx_domain::{
        ExtensionData, ExtensionElement, ExtensionHost, Keyed, ModelType, QualifiedName,
    };
}
