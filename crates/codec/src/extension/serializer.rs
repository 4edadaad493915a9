use crate::error::{CodecError, CodecErrorExt};
use crate::keyed::{self, KeyedEntry};
use crate::names;
use crate::registry::{NameRegistry, TypeDescriptor};
use gedx_domain::{ExtensionElement, ExtensionHost, ExtensionModel};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::any::{Any, TypeId};
use tracing::warn;

/// Writes a host's extension storage back out as wire properties.
#[derive(Debug, Clone)]
pub struct ExtensionSerializer {
    registry: NameRegistry,
}

/// Elements sharing one wire name.
struct Group<'a> {
    /// Set while every member is a model of this registered type.
    descriptor: Option<&'a TypeDescriptor>,
    members: Vec<&'a ExtensionElement>,
}

impl ExtensionSerializer {
    #[must_use]
    pub const fn new(registry: NameRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub const fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    /// Adds the host's extension attributes and elements to `out`.
    ///
    /// Properties already present in `out` (the host's declared fields) are kept; the
    /// colliding extension is dropped with a warning.
    ///
    /// # Errors
    /// Fails on a key uniqueness violation in a keyed group or when a model cannot be
    /// serialized.
    pub fn write<H>(&self, host: &H, out: &mut Map<String, Value>) -> Result<(), CodecError>
    where
        H: ExtensionHost + ?Sized,
    {
        let (elements, attributes) = host.extensibility().into_parts();

        for (name, scalar) in attributes.into_iter().flatten() {
            insert_checked(out, names::encode_name(name), Value::from(scalar.clone()));
        }

        for (property, group) in self.group(elements.unwrap_or_default()) {
            let value = self
                .encode_group(&property, &group)
                .context(format!("Encoding extension '{property}'"))?;
            insert_checked(out, property, value);
        }

        Ok(())
    }

    fn group<'a>(&'a self, elements: &'a [ExtensionElement]) -> IndexMap<String, Group<'a>> {
        let mut groups: IndexMap<String, Group<'a>> = IndexMap::new();

        for element in elements {
            let (property, descriptor) = match element {
                ExtensionElement::Model(model) => {
                    let descriptor = self.registry.descriptor_for(concrete_type_id(model.as_ref()));
                    let property = descriptor.map_or_else(
                        || names::encode_name(&model.model_name()),
                        TypeDescriptor::property_name,
                    );
                    (property, descriptor)
                },
                ExtensionElement::Generic(generic) => (names::encode_name(&generic.name), None),
            };

            groups
                .entry(property)
                .and_modify(|group| {
                    if !same_descriptor(group.descriptor, descriptor) {
                        group.descriptor = None;
                    }
                    group.members.push(element);
                })
                .or_insert_with(|| Group { descriptor, members: vec![element] });
        }

        groups
    }

    fn encode_group(&self, property: &str, group: &Group<'_>) -> Result<Value, CodecError> {
        if let Some(descriptor) = group.descriptor {
            let models = group
                .members
                .iter()
                .filter_map(|element| match element {
                    ExtensionElement::Model(model) => Some(model.as_ref()),
                    ExtensionElement::Generic(_) => None,
                })
                .collect::<Vec<&dyn ExtensionModel>>();
            return descriptor.encode(&models);
        }

        // A keyed wire name is read back as an object, so mixed content keeps that shape.
        if let Some(descriptor) = self.registry.resolve_by_wire_name(property).filter(|d| d.is_keyed()) {
            return encode_keyed_members(descriptor, &group.members);
        }

        let values =
            group.members.iter().map(|element| element.to_wire()).collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(values))
    }
}

/// Members of the keyed type keep their keys; everything else goes under the default key.
fn encode_keyed_members(
    descriptor: &TypeDescriptor,
    members: &[&ExtensionElement],
) -> Result<Value, CodecError> {
    let entries = members
        .iter()
        .map(|element| match element {
            ExtensionElement::Model(model) if concrete_type_id(model.as_ref()) == descriptor.type_id() => {
                descriptor.keyed_entry(model.as_ref())
            },
            other => Ok(KeyedEntry { key: None, unique: false, value: other.to_wire()? }),
        })
        .collect::<Result<Vec<_>, CodecError>>()?;
    Ok(Value::Object(keyed::encode_entries(entries)?))
}

fn same_descriptor(a: Option<&TypeDescriptor>, b: Option<&TypeDescriptor>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a.type_id() == b.type_id())
}

fn concrete_type_id(model: &dyn ExtensionModel) -> TypeId {
    <dyn Any as Any>::type_id(model.as_any())
}

fn insert_checked(out: &mut Map<String, Value>, property: String, value: Value) {
    if out.contains_key(&property) {
        warn!(property = %property, "Extension collides with a declared property, keeping the declared one");
        return;
    }
    out.insert(property, value);
}
