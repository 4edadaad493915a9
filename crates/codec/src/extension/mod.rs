//! # Extension Codec
//!
//! Open content on top of plain `serde`. A host embeds
//! [`ExtensionData`](gedx_domain::ExtensionData) with `#[serde(flatten)]`, so deserializing
//! captures every undeclared property. [`ExtensionDeserializer`] then routes those
//! properties through the [`NameRegistry`] into typed models, generic elements or scalar
//! attributes, and [`ExtensionSerializer`] writes them back next to the declared fields.
//!
//! [`ExtensionCodec`] bundles both directions with the `serde_json` round trip.

mod deserializer;
mod serializer;

pub use deserializer::{Absorbed, ExtensionDeserializer};
pub use serializer::ExtensionSerializer;

use crate::error::{CodecError, CodecErrorExt};
use crate::registry::NameRegistry;
use gedx_domain::ExtensionHost;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Both directions of the extension codec over one registry.
#[derive(Debug, Clone)]
pub struct ExtensionCodec {
    deserializer: ExtensionDeserializer,
    serializer: ExtensionSerializer,
}

impl Default for ExtensionCodec {
    fn default() -> Self {
        Self::new(NameRegistry::default())
    }
}

impl ExtensionCodec {
    #[must_use]
    pub fn new(registry: NameRegistry) -> Self {
        Self {
            deserializer: ExtensionDeserializer::new(registry.clone()),
            serializer: ExtensionSerializer::new(registry),
        }
    }

    /// A codec over the process-wide registry, or an empty one if it was never initialized.
    #[must_use]
    pub fn global() -> Self {
        Self::new(NameRegistry::global().cloned().unwrap_or_default())
    }

    #[must_use]
    pub const fn registry(&self) -> &NameRegistry {
        self.deserializer.registry()
    }

    /// See [`ExtensionDeserializer::absorb`].
    ///
    /// # Errors
    /// See [`ExtensionDeserializer::absorb`].
    pub fn absorb<H>(&self, host: &mut H, property: &str, value: Value) -> Result<Absorbed, CodecError>
    where
        H: ExtensionHost + ?Sized,
    {
        self.deserializer.absorb(host, property, value)
    }

    /// See [`ExtensionDeserializer::absorb_all`].
    ///
    /// # Errors
    /// See [`ExtensionDeserializer::absorb`].
    pub fn absorb_all<H>(&self, host: &mut H, properties: Map<String, Value>) -> Result<(), CodecError>
    where
        H: ExtensionHost + ?Sized,
    {
        self.deserializer.absorb_all(host, properties)
    }

    /// See [`ExtensionDeserializer::resolve`].
    ///
    /// # Errors
    /// See [`ExtensionDeserializer::absorb`].
    pub fn resolve<H>(&self, host: &mut H) -> Result<(), CodecError>
    where
        H: ExtensionHost + ?Sized,
    {
        self.deserializer.resolve(host)
    }

    /// See [`ExtensionSerializer::write`].
    ///
    /// # Errors
    /// See [`ExtensionSerializer::write`].
    pub fn write<H>(&self, host: &H, out: &mut Map<String, Value>) -> Result<(), CodecError>
    where
        H: ExtensionHost + ?Sized,
    {
        self.serializer.write(host, out)
    }

    /// Deserializes a host and resolves its captured extension properties.
    ///
    /// # Errors
    /// Returns [`CodecError::Json`] if the declared fields do not match, or any
    /// extension decoding failure.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_value<H>(&self, value: Value) -> Result<H, CodecError>
    where
        H: DeserializeOwned + ExtensionHost,
    {
        let mut host: H = serde_json::from_value(value).context("Deserializing extension host")?;
        self.resolve(&mut host)?;
        Ok(host)
    }

    /// [`Self::from_value`] over JSON text.
    ///
    /// # Errors
    /// See [`Self::from_value`].
    #[allow(clippy::wrong_self_convention)]
    pub fn from_json<H>(&self, json: &str) -> Result<H, CodecError>
    where
        H: DeserializeOwned + ExtensionHost,
    {
        let mut host: H = serde_json::from_str(json).context("Parsing extension host")?;
        self.resolve(&mut host)?;
        Ok(host)
    }

    /// Serializes a host's declared fields and appends its extensions.
    ///
    /// # Errors
    /// Returns [`CodecError::NotAnObject`] if the host does not serialize to an object,
    /// or any extension encoding failure.
    pub fn to_value<H>(&self, host: &H) -> Result<Value, CodecError>
    where
        H: Serialize + ExtensionHost + ?Sized,
    {
        match serde_json::to_value(host).context("Serializing extension host")? {
            Value::Object(mut map) => {
                self.write(host, &mut map)?;
                Ok(Value::Object(map))
            },
            _ => Err(CodecError::NotAnObject {
                message: std::any::type_name::<H>().into(),
                context: Some("Serializing extension host".into()),
            }),
        }
    }

    /// [`Self::to_value`] rendered as compact JSON text.
    ///
    /// # Errors
    /// See [`Self::to_value`].
    pub fn to_json<H>(&self, host: &H) -> Result<String, CodecError>
    where
        H: Serialize + ExtensionHost + ?Sized,
    {
        let value = self.to_value(host)?;
        Ok(serde_json::to_string(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gedx_domain::{Extensibility, ExtensibilityMut, ExtensibilityRef, ExtensionData, ExtensionElement};
    use serde_json::json;

    #[derive(Debug, Default)]
    struct AttributesOnly {
        extensions: ExtensionData,
    }

    impl ExtensionHost for AttributesOnly {
        fn extensibility(&self) -> ExtensibilityRef<'_> {
            Extensibility::Attributes(self.extensions.attributes())
        }

        fn extensibility_mut(&mut self) -> ExtensibilityMut<'_> {
            Extensibility::Attributes(self.extensions.attributes_mut())
        }
    }

    #[test]
    fn test_scalars_become_attributes() {
        let codec = ExtensionCodec::default();
        let mut host = ExtensionData::new();

        let absorbed = codec.absorb(&mut host, "http://example.org/ns#lang", json!("en")).unwrap();
        assert_eq!(absorbed, Absorbed::Attribute);

        let (name, value) = host.attributes().first().unwrap();
        assert_eq!(name.namespace(), "http://example.org/ns#");
        assert_eq!(name.local_name(), "lang");
        assert_eq!(value.as_str(), Some("en"));
    }

    #[test]
    fn test_structured_values_skip_attribute_only_hosts() {
        let codec = ExtensionCodec::default();
        let mut host = AttributesOnly::default();

        assert_eq!(codec.absorb(&mut host, "tags", json!([1])).unwrap(), Absorbed::Discarded);
        assert_eq!(codec.absorb(&mut host, "flag", json!(true)).unwrap(), Absorbed::Attribute);
        assert_eq!(host.extensions.attributes().len(), 1);
    }

    #[test]
    fn test_generic_elements_round_trip_as_arrays() {
        let codec = ExtensionCodec::default();
        let mut host = ExtensionData::new();

        codec.absorb(&mut host, "tags", json!([{ "a": 1 }, { "a": 2 }])).unwrap();
        codec.absorb(&mut host, "single", json!({ "b": 1 })).unwrap();
        assert_eq!(host.elements().len(), 3);
        assert!(matches!(&host.elements()[2], ExtensionElement::Generic(g) if g.name.local_name() == "single"));

        let mut out = Map::new();
        codec.write(&host, &mut out).unwrap();
        assert_eq!(Value::Object(out), json!({ "tags": [{ "a": 1 }, { "a": 2 }], "single": [{ "b": 1 }] }));
    }

    #[test]
    fn test_declared_fields_win_over_extensions() {
        let codec = ExtensionCodec::default();
        let mut host = ExtensionData::new();
        host.add_element(ExtensionElement::generic(
            gedx_domain::QualifiedName::local("id").unwrap(),
            json!("ext"),
        ));

        let mut out = Map::new();
        out.insert("id".into(), json!("declared"));
        codec.write(&host, &mut out).unwrap();
        assert_eq!(out["id"], json!("declared"));
    }
}
