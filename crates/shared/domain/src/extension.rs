//! Extension storage: what a host object keeps beyond its declared fields.
//!
//! A host exposes its storage through [`ExtensionHost`], which reports an [`Extensibility`]
//! variant instead of having the codec probe the host's concrete type. Most hosts embed an
//! [`ExtensionData`] with `#[serde(flatten)]` and forward to it.

use crate::model::{ExtensionModel, ModelType};
use crate::name::QualifiedName;
use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

/// A scalar wire value, the only kind allowed in extension attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Splits scalars from structured values, handing the latter back unchanged.
    ///
    /// # Errors
    /// Returns the original value when it is an array or an object.
    pub fn try_from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => Ok(Self::Number(n)),
            Value::String(s) => Ok(Self::String(s)),
            other @ (Value::Array(_) | Value::Object(_)) => Err(other),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Self::Null,
            Scalar::Bool(b) => Self::Bool(b),
            Scalar::Number(n) => Self::Number(n),
            Scalar::String(s) => Self::String(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Extension attributes in insertion order.
pub type ExtensionAttributes = IndexMap<QualifiedName, Scalar>;

/// An extension value of a type nobody registered: its name plus the raw wire value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericElement {
    pub name: QualifiedName,
    pub value: Value,
}

/// One entry of a host's extension element list.
#[derive(Debug)]
pub enum ExtensionElement {
    /// A value of a known model type.
    Model(Box<dyn ExtensionModel>),
    /// A namespace-qualified wrapper around content of unknown type.
    Generic(GenericElement),
}

impl ExtensionElement {
    #[must_use]
    pub fn model<T: ModelType>(value: T) -> Self {
        Self::Model(Box::new(value))
    }

    #[must_use]
    pub const fn generic(name: QualifiedName, value: Value) -> Self {
        Self::Generic(GenericElement { name, value })
    }

    /// The element's name: model name for typed values, the carried name otherwise.
    #[must_use]
    pub fn name(&self) -> QualifiedName {
        match self {
            Self::Model(model) => model.model_name(),
            Self::Generic(generic) => generic.name.clone(),
        }
    }

    #[must_use]
    pub fn as_model<T: ModelType>(&self) -> Option<&T> {
        match self {
            Self::Model(model) => model.downcast_ref::<T>(),
            Self::Generic(_) => None,
        }
    }

    #[must_use]
    pub const fn as_generic(&self) -> Option<&GenericElement> {
        match self {
            Self::Generic(generic) => Some(generic),
            Self::Model(_) => None,
        }
    }

    /// The element's wire value.
    ///
    /// # Errors
    /// Propagates serialization failures of typed values.
    pub fn to_wire(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Model(model) => model.to_wire(),
            Self::Generic(generic) => Ok(generic.value.clone()),
        }
    }
}

/// Which extension storage a host offers.
#[derive(Debug)]
pub enum Extensibility<E, A> {
    Elements(E),
    Attributes(A),
    Both(E, A),
    Neither,
}

/// Mutable view used while absorbing unrecognized input.
pub type ExtensibilityMut<'a> =
    Extensibility<&'a mut Vec<ExtensionElement>, &'a mut ExtensionAttributes>;

/// Read-only view used while writing extensions back out.
pub type ExtensibilityRef<'a> = Extensibility<&'a [ExtensionElement], &'a ExtensionAttributes>;

impl<E, A> Extensibility<E, A> {
    #[must_use]
    pub const fn supports_elements(&self) -> bool {
        matches!(self, Self::Elements(_) | Self::Both(..))
    }

    #[must_use]
    pub const fn supports_attributes(&self) -> bool {
        matches!(self, Self::Attributes(_) | Self::Both(..))
    }

    /// `(elements, attributes)` storage, either of which may be absent.
    pub fn into_parts(self) -> (Option<E>, Option<A>) {
        match self {
            Self::Elements(e) => (Some(e), None),
            Self::Attributes(a) => (None, Some(a)),
            Self::Both(e, a) => (Some(e), Some(a)),
            Self::Neither => (None, None),
        }
    }
}

/// A model object that can hold content beyond its declared fields.
pub trait ExtensionHost {
    fn extensibility(&self) -> ExtensibilityRef<'_>;

    fn extensibility_mut(&mut self) -> ExtensibilityMut<'_>;

    /// Drains wire properties captured during deserialization but not yet resolved.
    fn take_unrecognized(&mut self) -> Map<String, Value> {
        Map::new()
    }
}

/// Ready-made extension storage for hosts.
///
/// Embed it with `#[serde(flatten)]`: deserializing captures every property the host did
/// not declare, and serializing writes back whatever has not been resolved yet, so a host
/// round-trips losslessly even before a codec looks at it.
#[derive(Debug, Default)]
pub struct ExtensionData {
    elements: Vec<ExtensionElement>,
    attributes: ExtensionAttributes,
    unrecognized: Map<String, Value>,
}

impl ExtensionData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn elements(&self) -> &[ExtensionElement] {
        &self.elements
    }

    pub const fn elements_mut(&mut self) -> &mut Vec<ExtensionElement> {
        &mut self.elements
    }

    #[must_use]
    pub const fn attributes(&self) -> &ExtensionAttributes {
        &self.attributes
    }

    pub const fn attributes_mut(&mut self) -> &mut ExtensionAttributes {
        &mut self.attributes
    }

    pub fn add_element(&mut self, element: ExtensionElement) {
        self.elements.push(element);
    }

    pub fn add_model<T: ModelType>(&mut self, value: T) {
        self.elements.push(ExtensionElement::model(value));
    }

    /// First extension element of type `T`.
    #[must_use]
    pub fn find_extension_of_type<T: ModelType>(&self) -> Option<&T> {
        self.elements.iter().find_map(ExtensionElement::as_model::<T>)
    }

    /// Every extension element of type `T`, in list order.
    #[must_use]
    pub fn find_extensions_of_type<T: ModelType>(&self) -> Vec<&T> {
        self.elements.iter().filter_map(ExtensionElement::as_model::<T>).collect()
    }

    /// Removes every extension element of type `T` and returns how many were dropped.
    pub fn remove_extensions_of_type<T: ModelType>(&mut self) -> usize {
        let before = self.elements.len();
        self.elements.retain(|element| element.as_model::<T>().is_none());
        before - self.elements.len()
    }

    #[must_use]
    pub fn attribute(&self, name: &QualifiedName) -> Option<&Scalar> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: QualifiedName, value: impl Into<Scalar>) -> Option<Scalar> {
        self.attributes.insert(name, value.into())
    }

    /// Properties captured during deserialization that nothing has resolved yet.
    #[must_use]
    pub const fn unrecognized(&self) -> &Map<String, Value> {
        &self.unrecognized
    }

    pub fn take_unrecognized(&mut self) -> Map<String, Value> {
        std::mem::take(&mut self.unrecognized)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.attributes.is_empty() && self.unrecognized.is_empty()
    }

    /// Both storages, for hosts that accept elements and attributes.
    pub const fn as_both_mut(&mut self) -> ExtensibilityMut<'_> {
        Extensibility::Both(&mut self.elements, &mut self.attributes)
    }

    #[must_use]
    pub fn as_both(&self) -> ExtensibilityRef<'_> {
        Extensibility::Both(&self.elements, &self.attributes)
    }
}

impl ExtensionHost for ExtensionData {
    fn extensibility(&self) -> ExtensibilityRef<'_> {
        self.as_both()
    }

    fn extensibility_mut(&mut self) -> ExtensibilityMut<'_> {
        self.as_both_mut()
    }

    fn take_unrecognized(&mut self) -> Map<String, Value> {
        Self::take_unrecognized(self)
    }
}

impl Serialize for ExtensionData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.unrecognized.len()))?;
        for (key, value) in &self.unrecognized {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ExtensionData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CaptureVisitor;

        impl<'de> Visitor<'de> for CaptureVisitor {
            type Value = ExtensionData;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of extension properties")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut unrecognized = Map::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    if unrecognized.contains_key(&key) {
                        return Err(de::Error::custom(format_args!("duplicate property `{key}`")));
                    }
                    unrecognized.insert(key, value);
                }
                Ok(ExtensionData { unrecognized, ..ExtensionData::default() })
            }
        }

        deserializer.deserialize_map(CaptureVisitor)
    }
}
