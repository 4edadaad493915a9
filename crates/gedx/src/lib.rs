//! Facade crate for the GEDX open-content codec.
//! Re-exports the domain capability types and the codec, and wires up the process-wide
//! registry.
//! Keep this crate thin: it composes other crates, it does not implement codec logic.
//!
//! ## Usage
//! - Depend on `gedx` (the `derive` feature brings in `#[model_type]` and `#[gedx_error]`).
//!   Types using `#[model_type]` also need `serde` and `gedx-domain` as direct dependencies.
//! - Call [`init`] once at startup with the catalogue of every model type the process can
//!   read, then hand the returned [`ExtensionCodec`](codec::ExtensionCodec) to whatever
//!   (de)serializes hosts.

pub use gedx_codec as codec;
pub use gedx_domain as domain;

#[cfg(feature = "derive")]
pub use gedx_derive::{gedx_error, model_type};

use gedx_codec::config::RegistryConfig;
use gedx_codec::{Catalogue, ExtensionCodec, NameRegistry};

/// Build-time enabled features (by Cargo feature).
pub const ENABLED: &[&str] = &[
    #[cfg(feature = "derive")]
    "derive",
];

#[must_use]
pub fn is_enabled(name: &str) -> bool {
    ENABLED.contains(&name)
}

/// Initializes the process-wide name registry and returns a codec over it.
///
/// Discovery failures never fail initialization; see
/// [`RegistryBuilder::discover`](gedx_codec::RegistryBuilder::discover).
#[must_use]
pub fn init(catalogue: &Catalogue, config: &RegistryConfig) -> ExtensionCodec {
    ExtensionCodec::new(NameRegistry::initialize(catalogue, config).clone())
}

pub mod prelude {
    pub use gedx_codec::prelude::*;
    pub use gedx_codec::{Absorbed, ExtensionDeserializer, ExtensionSerializer};
    pub use gedx_domain::{
        DEFAULT_KEY, Extensibility, ExtensibilityMut, ExtensibilityRef, ExtensionAttributes,
        GenericElement, Scalar, XML_NAMESPACE,
    };

    #[cfg(feature = "derive")]
    pub use gedx_derive::{gedx_error, model_type};
}
