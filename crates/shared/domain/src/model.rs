//! Static model metadata and the type-erased form stored in extension lists.

use crate::name::QualifiedName;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::borrow::Cow;
use std::fmt::Debug;

/// Metadata every wire model type declares about itself.
///
/// Normally implemented through `#[gedx_derive::model_type(...)]`.
pub trait ModelType: Serialize + DeserializeOwned + Debug + Send + Sync + 'static {
    /// Namespace the type belongs to.
    const NAMESPACE: &'static str;

    /// Structural name; `None` falls back to the decapitalized Rust type name.
    const NAME: Option<&'static str> = None;

    /// Local name of the wire property wrapping values of this type, if it declares one.
    const WRAPPER: Option<&'static str> = None;

    /// Preferred prefix for [`Self::NAMESPACE`] in prefix-based formats.
    const PREFIX: Option<&'static str> = None;

    /// The structural name, explicit or derived from the type name.
    #[must_use]
    fn structural_name() -> Cow<'static, str> {
        Self::NAME.filter(|name| !name.is_empty()).map_or_else(
            || Cow::Owned(decapitalize(short_type_name(std::any::type_name::<Self>()))),
            Cow::Borrowed,
        )
    }

    /// The type identifier: namespace plus structural name.
    #[must_use]
    fn type_identifier() -> QualifiedName {
        QualifiedName::from_parts(Self::NAMESPACE, Self::structural_name())
    }

    /// The wrapper element name, for types that declare one.
    #[must_use]
    fn wrapper_name() -> Option<QualifiedName> {
        Self::WRAPPER.and_then(|local| QualifiedName::new(Self::NAMESPACE, local))
    }
}

/// Object-safe view of a [`ModelType`] value, as stored in extension element lists.
pub trait ExtensionModel: Any + Debug + Send + Sync {
    /// Helper to allow downcasting from the trait object.
    fn as_any(&self) -> &dyn Any;

    /// `std::any::type_name` of the concrete type.
    fn model_type_name(&self) -> &'static str;

    /// The wrapper name if declared, the type identifier otherwise.
    fn model_name(&self) -> QualifiedName;

    /// Serializes the value into the flat JSON wire shape.
    ///
    /// # Errors
    /// Propagates the concrete type's serialization failure.
    fn to_wire(&self) -> Result<Value, serde_json::Error>;
}

impl<T: ModelType> ExtensionModel for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn model_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn model_name(&self) -> QualifiedName {
        T::wrapper_name().unwrap_or_else(T::type_identifier)
    }

    fn to_wire(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl dyn ExtensionModel {
    #[must_use]
    pub fn downcast_ref<T: ExtensionModel>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[must_use]
    pub fn is<T: ExtensionModel>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// `a::b::Person<c::D>` -> `Person`.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Lowercases the first character unless the name starts with an acronym (`URLRef` stays).
fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            name.to_owned()
        },
        (Some(first), _) => first.to_lowercase().chain(name.chars().skip(1)).collect(),
        (None, _) => String::new(),
    }
}
