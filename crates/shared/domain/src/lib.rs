//! # Domain Capabilities
//!
//! Pure types and traits that model objects implement so the codec can reach into them.
//! Keep it lean: no I/O and no wire-format logic, just data and small helpers.
//!
//! * [`QualifiedName`] - a `(namespace, local)` pair.
//! * [`ModelType`] / [`ExtensionModel`] - static model metadata and its object-safe form.
//! * [`ExtensionHost`] / [`Extensibility`] - what a host can store beyond its declared fields.
//! * [`Keyed`] - items encoded as object keys instead of array positions.

pub mod extension;
pub mod keyed;
pub mod model;
pub mod name;

pub use extension::{
    ExtensibilityMut, ExtensibilityRef, Extensibility, ExtensionAttributes, ExtensionData,
    ExtensionElement, ExtensionHost, GenericElement, Scalar,
};
pub use keyed::{DEFAULT_KEY, Keyed};
pub use model::{ExtensionModel, ModelType};
pub use name::{QualifiedName, XML_NAMESPACE};
