use crate::error::{CodecError, CodecErrorExt};
use crate::keyed::{self, KeyedEntry};
use crate::names;
use fxhash::FxHashMap;
use gedx_domain::{ExtensionElement, ExtensionModel, Keyed, ModelType, QualifiedName};
use serde_json::Value;
use std::any::TypeId;

/// Decodes one wire property value into extension elements of the described type.
pub type DecodeFn = fn(Value) -> Result<Vec<ExtensionElement>, CodecError>;

/// Encodes a group of values of the described type into one wire property value.
pub type EncodeFn = fn(&[&dyn ExtensionModel]) -> Result<Value, CodecError>;

/// Captures one value of a keyed type as a keyed-collection entry.
pub type EntryFn = fn(&dyn ExtensionModel) -> Result<KeyedEntry, CodecError>;

/// A registered type entry.
///
/// Built from a [`ModelType`] without any runtime introspection: the metadata comes from
/// the trait constants, and the erased decode/encode entry points are monomorphized
/// function pointers.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    identifier: QualifiedName,
    wrapper: Option<QualifiedName>,
    wire_name: Option<String>,
    prefix: Option<&'static str>,
    entry: Option<EntryFn>,
    decode: DecodeFn,
    encode: EncodeFn,
}

impl TypeDescriptor {
    /// Describes a plain model type: a property holds one value or an array of values.
    #[must_use]
    pub fn of<T: ModelType>() -> Self {
        Self::build::<T>(None, decode_plain::<T>, encode_plain)
    }

    /// Describes a keyed model type: a property holds an object of keyed items.
    #[must_use]
    pub fn keyed<T: ModelType + Keyed>() -> Self {
        Self::build::<T>(Some(entry_keyed::<T>), decode_keyed::<T>, encode_keyed::<T>)
    }

    fn build<T: ModelType>(entry: Option<EntryFn>, decode: DecodeFn, encode: EncodeFn) -> Self {
        let wrapper = T::wrapper_name();
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            identifier: T::type_identifier(),
            wire_name: wrapper.as_ref().map(names::encode_name),
            wrapper,
            prefix: T::PREFIX,
            entry,
            decode,
            encode,
        }
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully-qualified Rust type name, as listed in marker files.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Namespace plus structural name.
    #[must_use]
    pub const fn identifier(&self) -> &QualifiedName {
        &self.identifier
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        self.identifier.namespace()
    }

    #[must_use]
    pub const fn wrapper(&self) -> Option<&QualifiedName> {
        self.wrapper.as_ref()
    }

    /// Canonical wire name, present only for types declaring a wrapper.
    #[must_use]
    pub fn wire_name(&self) -> Option<&str> {
        self.wire_name.as_deref()
    }

    /// The property name values of this type are written under.
    #[must_use]
    pub fn property_name(&self) -> String {
        self.wire_name.clone().unwrap_or_else(|| names::encode_name(&self.identifier))
    }

    #[must_use]
    pub const fn prefix(&self) -> Option<&'static str> {
        self.prefix
    }

    #[must_use]
    pub const fn is_keyed(&self) -> bool {
        self.entry.is_some()
    }

    /// Decodes a wire property value into elements of this type.
    ///
    /// # Errors
    /// Propagates JSON and keyed-collection failures.
    pub fn decode(&self, value: Value) -> Result<Vec<ExtensionElement>, CodecError> {
        (self.decode)(value)
    }

    /// Encodes values of this type into one wire property value.
    ///
    /// # Errors
    /// Returns [`CodecError::UniquenessViolation`] for invalid keyed groups and
    /// [`CodecError::Internal`] if a value is not of the described type.
    pub fn encode(&self, values: &[&dyn ExtensionModel]) -> Result<Value, CodecError> {
        (self.encode)(values)
    }

    /// Captures `value` as a keyed-collection entry.
    ///
    /// # Errors
    /// Returns [`CodecError::Internal`] if this type is not keyed or `value` is not of the
    /// described type.
    pub fn keyed_entry(&self, value: &dyn ExtensionModel) -> Result<KeyedEntry, CodecError> {
        let entry = self.entry.ok_or_else(|| CodecError::Internal {
            message: format!("{} is not a keyed type", self.type_name).into(),
            context: None,
        })?;
        entry(value)
    }
}

fn decode_plain<T: ModelType>(value: Value) -> Result<Vec<ExtensionElement>, CodecError> {
    let values = match value {
        Value::Array(values) => values,
        single => vec![single],
    };
    values
        .into_iter()
        .map(|v| serde_json::from_value::<T>(v).map(ExtensionElement::model))
        .collect::<Result<Vec<_>, serde_json::Error>>()
        .context(std::any::type_name::<T>())
}

fn encode_plain(values: &[&dyn ExtensionModel]) -> Result<Value, CodecError> {
    let wire = values.iter().map(|v| v.to_wire()).collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(wire))
}

fn decode_keyed<T: ModelType + Keyed>(value: Value) -> Result<Vec<ExtensionElement>, CodecError> {
    Ok(keyed::decode::<T>(value)?.into_iter().map(ExtensionElement::model).collect())
}

fn encode_keyed<T: ModelType + Keyed>(values: &[&dyn ExtensionModel]) -> Result<Value, CodecError> {
    let typed = values.iter().map(|v| downcast::<T>(*v)).collect::<Result<Vec<&T>, _>>()?;
    Ok(Value::Object(keyed::encode(typed)?))
}

fn entry_keyed<T: ModelType + Keyed>(value: &dyn ExtensionModel) -> Result<KeyedEntry, CodecError> {
    KeyedEntry::of(downcast::<T>(value)?)
}

fn downcast<T: ModelType>(value: &dyn ExtensionModel) -> Result<&T, CodecError> {
    value.downcast_ref::<T>().ok_or_else(|| CodecError::Internal {
        message: format!("expected {}, found {}", std::any::type_name::<T>(), value.model_type_name())
            .into(),
        context: Some("Encoding keyed extension group".into()),
    })
}

/// The static registration table: every model type a module can offer, by type name.
///
/// Marker files name the entries to register; a name missing here is skipped the same
/// way an unloadable type would be.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    entries: FxHashMap<&'static str, TypeDescriptor>,
}

impl Catalogue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.entries.insert(descriptor.type_name, descriptor);
    }

    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.entries.get(type_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.entries.values()
    }
}

impl Extend<TypeDescriptor> for Catalogue {
    fn extend<I: IntoIterator<Item = TypeDescriptor>>(&mut self, iter: I) {
        for descriptor in iter {
            self.insert(descriptor);
        }
    }
}

impl FromIterator<TypeDescriptor> for Catalogue {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        let mut catalogue = Self::new();
        catalogue.extend(iter);
        catalogue
    }
}
