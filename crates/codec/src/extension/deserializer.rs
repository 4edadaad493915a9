use crate::error::{CodecError, CodecErrorExt};
use crate::registry::NameRegistry;
use gedx_domain::{ExtensionElement, ExtensionHost, QualifiedName, Scalar};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

/// Where an absorbed property ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absorbed {
    /// Stored as one extension attribute.
    Attribute,
    /// Appended as this many extension elements.
    Elements(usize),
    /// The host has no storage for it.
    Discarded,
}

/// Routes unrecognized properties into a host's extension storage.
#[derive(Debug, Clone)]
pub struct ExtensionDeserializer {
    registry: NameRegistry,
}

impl ExtensionDeserializer {
    #[must_use]
    pub const fn new(registry: NameRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub const fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    /// Absorbs one unrecognized property.
    ///
    /// Scalars go to the attribute map when the host has one. Anything else goes to the
    /// element list: decoded as the registered type the property name resolves to, or
    /// wrapped in generic elements (one per array entry) otherwise. Hosts without a
    /// matching storage drop the value, and so does every host for a property name that
    /// decodes to no qualified name (the empty name).
    ///
    /// # Errors
    /// Fails when a registered type does not match the value or when keyed input is
    /// malformed.
    pub fn absorb<H>(&self, host: &mut H, property: &str, value: Value) -> Result<Absorbed, CodecError>
    where
        H: ExtensionHost + ?Sized,
    {
        let (elements, attributes) = host.extensibility_mut().into_parts();

        let value = match attributes {
            Some(attributes) => match Scalar::try_from_value(value) {
                Ok(scalar) => {
                    let Some(name) = self.property_name(property) else {
                        return Ok(Absorbed::Discarded);
                    };
                    attributes.insert(name, scalar);
                    return Ok(Absorbed::Attribute);
                },
                Err(structured) => structured,
            },
            None => value,
        };

        let Some(elements) = elements else {
            trace!(property, "Discarding extension content: host takes no elements");
            return Ok(Absorbed::Discarded);
        };

        let Some(decoded) = self.decode_elements(property, value)? else {
            return Ok(Absorbed::Discarded);
        };
        let count = decoded.len();
        elements.extend(decoded);
        Ok(Absorbed::Elements(count))
    }

    /// Absorbs every property of `properties`, in map order.
    ///
    /// # Errors
    /// Stops at the first property that fails, see [`Self::absorb`].
    pub fn absorb_all<H>(&self, host: &mut H, properties: Map<String, Value>) -> Result<(), CodecError>
    where
        H: ExtensionHost + ?Sized,
    {
        let total = properties.len();
        let mut discarded = 0_usize;
        for (property, value) in properties {
            if self.absorb(host, &property, value)? == Absorbed::Discarded {
                discarded += 1;
            }
        }
        if total > 0 {
            debug!(total, discarded, "Absorbed extension properties");
        }
        Ok(())
    }

    /// Drains the host's captured-but-unresolved properties into its extension storage.
    ///
    /// # Errors
    /// See [`Self::absorb`].
    pub fn resolve<H>(&self, host: &mut H) -> Result<(), CodecError>
    where
        H: ExtensionHost + ?Sized,
    {
        let properties = host.take_unrecognized();
        self.absorb_all(host, properties)
    }

    /// `None` when `property` has no qualified-name reading; the content is then dropped.
    fn property_name(&self, property: &str) -> Option<QualifiedName> {
        match self.registry.decode_name(property) {
            Ok(name) => Some(name),
            Err(e) => {
                warn!(property, err = %e, "Discarding extension content with an undecodable name");
                None
            },
        }
    }

    fn decode_elements(
        &self,
        property: &str,
        value: Value,
    ) -> Result<Option<Vec<ExtensionElement>>, CodecError> {
        if let Some(descriptor) = self.registry.resolve_by_wire_name(property) {
            return descriptor
                .decode(value)
                .context(format!("Decoding extension '{property}'"))
                .map(Some);
        }

        let Some(name) = self.property_name(property) else {
            return Ok(None);
        };

        // Types without a wrapper are written under their type identifier.
        if let Some(descriptor) = self.registry.resolve_by_type_id(&name) {
            return descriptor
                .decode(value)
                .context(format!("Decoding extension '{property}'"))
                .map(Some);
        }

        Ok(Some(match value {
            Value::Array(values) => {
                values.into_iter().map(|v| ExtensionElement::generic(name.clone(), v)).collect()
            },
            single => vec![ExtensionElement::generic(name, single)],
        }))
    }
}
