//! # Name Registry
//!
//! The single source of truth for type-name and namespace-prefix resolution.
//!
//! A [`RegistryBuilder`] collects [`TypeDescriptor`]s (explicitly, or from marker files via
//! [`RegistryBuilder::discover`]) and freezes them into a [`NameRegistry`]: an immutable,
//! `Arc`-backed handle that is cheap to clone into codecs. A process-wide instance can be
//! set up once with [`NameRegistry::initialize`] and read back with [`NameRegistry::global`].

mod descriptor;
pub mod discovery;

pub use descriptor::{Catalogue, DecodeFn, EncodeFn, TypeDescriptor};

use crate::config::RegistryConfig;
use crate::error::CodecError;
use crate::names;
use fxhash::FxHashMap;
use gedx_domain::{Keyed, ModelType, QualifiedName, XML_NAMESPACE};
use std::any::TypeId;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Prefix bound to [`XML_NAMESPACE`] in every registry.
pub const XML_PREFIX: &str = "xml";

static GLOBAL: OnceLock<NameRegistry> = OnceLock::new();

/// Collects registrations before the registry is frozen.
#[derive(Debug)]
pub struct RegistryBuilder {
    descriptors: Vec<TypeDescriptor>,
    declared_prefixes: FxHashMap<String, String>,
    explicit_prefixes: FxHashMap<String, String>,
    default_namespace: Option<String>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        let mut explicit_prefixes = FxHashMap::default();
        explicit_prefixes.insert(XML_NAMESPACE.to_owned(), XML_PREFIX.to_owned());
        Self {
            descriptors: Vec::new(),
            declared_prefixes: FxHashMap::default(),
            explicit_prefixes,
            default_namespace: None,
        }
    }
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type entry. Registering the same Rust type twice is a no-op.
    #[must_use]
    pub fn register(mut self, descriptor: TypeDescriptor) -> Self {
        if self.descriptors.iter().any(|d| d.type_id() == descriptor.type_id()) {
            return self;
        }

        if let Some(prefix) = descriptor.prefix() {
            self.declared_prefixes
                .entry(descriptor.namespace().to_owned())
                .or_insert_with(|| prefix.to_owned());
        }

        debug!(
            type_name = descriptor.type_name(),
            wire_name = descriptor.wire_name().unwrap_or("-"),
            type_id = %descriptor.identifier(),
            "Registered model type"
        );
        self.descriptors.push(descriptor);
        self
    }

    #[must_use]
    pub fn register_type<T: ModelType>(self) -> Self {
        self.register(TypeDescriptor::of::<T>())
    }

    #[must_use]
    pub fn register_keyed<T: ModelType + Keyed>(self) -> Self {
        self.register(TypeDescriptor::keyed::<T>())
    }

    /// Binds `prefix` to `namespace`, overriding any prefix declared by model types.
    #[must_use]
    pub fn prefix(mut self, namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.explicit_prefixes.insert(namespace.into(), prefix.into());
        self
    }

    /// The namespace that needs no prefix in the enclosing document.
    #[must_use]
    pub fn default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = Some(namespace.into());
        self
    }

    /// Applies the prefix bindings and default namespace of `config`.
    #[must_use]
    pub fn configure(mut self, config: &RegistryConfig) -> Self {
        for binding in &config.prefixes {
            self = self.prefix(binding.namespace.clone(), binding.prefix.clone());
        }
        if let Some(namespace) = &config.default_namespace {
            self = self.default_namespace(namespace.clone());
        }
        self
    }

    /// Registers every catalogue entry named by a marker file under the configured roots,
    /// then applies the rest of `config`.
    ///
    /// Unknown type names are logged and skipped.
    #[must_use]
    pub fn discover(mut self, catalogue: &Catalogue, config: &RegistryConfig) -> Self {
        for entry in discovery::scan_markers(config) {
            match catalogue.get(&entry.type_name) {
                Some(descriptor) => self = self.register(descriptor.clone()),
                None => warn!(
                    marker = %entry.marker.display(),
                    line = entry.line,
                    type_name = %entry.type_name,
                    "Skipping unknown model type"
                ),
            }
        }
        self.configure(config)
    }

    /// Freezes the registrations.
    ///
    /// When two types claim the same wire name or type identifier, the first registration
    /// keeps it and the later one is only reachable by Rust type.
    #[must_use]
    pub fn build(self) -> NameRegistry {
        let mut by_rust_type = FxHashMap::default();
        let mut by_wire_name: FxHashMap<String, usize> = FxHashMap::default();
        let mut by_type_id: FxHashMap<QualifiedName, usize> = FxHashMap::default();

        for (idx, descriptor) in self.descriptors.iter().enumerate() {
            by_rust_type.insert(descriptor.type_id(), idx);

            if let Some(wire_name) = descriptor.wire_name() {
                if let Some(&first) = by_wire_name.get(wire_name) {
                    warn!(
                        wire_name,
                        kept = self.descriptors[first].type_name(),
                        ignored = descriptor.type_name(),
                        "Duplicate wire name"
                    );
                } else {
                    by_wire_name.insert(wire_name.to_owned(), idx);
                }
            }

            if let Some(&first) = by_type_id.get(descriptor.identifier()) {
                warn!(
                    type_id = %descriptor.identifier(),
                    kept = self.descriptors[first].type_name(),
                    ignored = descriptor.type_name(),
                    "Duplicate type identifier"
                );
            } else {
                by_type_id.insert(descriptor.identifier().clone(), idx);
            }
        }

        let mut prefixes = self.declared_prefixes;
        prefixes.extend(self.explicit_prefixes);

        let mut namespaces: Vec<String> = self
            .descriptors
            .iter()
            .map(|d| d.namespace().to_owned())
            .chain(prefixes.keys().cloned())
            .chain(self.default_namespace.iter().cloned())
            .chain(std::iter::once(XML_NAMESPACE.to_owned()))
            .filter(|ns| !ns.is_empty())
            .collect();
        namespaces.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        namespaces.dedup();

        info!(types = self.descriptors.len(), namespaces = namespaces.len(), "Name registry ready");

        NameRegistry {
            inner: Arc::new(RegistryInner {
                descriptors: self.descriptors,
                by_rust_type,
                by_wire_name,
                by_type_id,
                prefixes,
                namespaces,
                default_namespace: self.default_namespace,
            }),
        }
    }
}

#[derive(Debug)]
struct RegistryInner {
    descriptors: Vec<TypeDescriptor>,
    by_rust_type: FxHashMap<TypeId, usize>,
    by_wire_name: FxHashMap<String, usize>,
    by_type_id: FxHashMap<QualifiedName, usize>,
    prefixes: FxHashMap<String, String>,
    /// Longest first, so prefix matching can stop at the first hit.
    namespaces: Vec<String>,
    default_namespace: Option<String>,
}

/// Immutable handle to a frozen registry.
#[derive(Debug, Clone)]
pub struct NameRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for NameRegistry {
    fn default() -> Self {
        RegistryBuilder::new().build()
    }
}

impl NameRegistry {
    /// Populates the process-wide registry from `catalogue` and the marker files found
    /// under `config`.
    ///
    /// Only the first call does any work; concurrent callers block until it finishes and
    /// every caller gets the same instance.
    pub fn initialize(catalogue: &Catalogue, config: &RegistryConfig) -> &'static Self {
        GLOBAL.get_or_init(|| RegistryBuilder::new().discover(catalogue, config).build())
    }

    /// The process-wide registry, if [`Self::initialize`] has run.
    #[must_use]
    pub fn global() -> Option<&'static Self> {
        GLOBAL.get()
    }

    /// Type whose canonical wire name is exactly `wire_name`.
    #[must_use]
    pub fn resolve_by_wire_name(&self, wire_name: &str) -> Option<&TypeDescriptor> {
        self.inner.by_wire_name.get(wire_name).map(|&idx| &self.inner.descriptors[idx])
    }

    /// Type whose identifier (namespace + structural name) is `type_id`.
    #[must_use]
    pub fn resolve_by_type_id(&self, type_id: &QualifiedName) -> Option<&TypeDescriptor> {
        self.inner.by_type_id.get(type_id).map(|&idx| &self.inner.descriptors[idx])
    }

    #[must_use]
    pub fn resolve_by_type<T: 'static>(&self) -> Option<&TypeDescriptor> {
        self.descriptor_for(TypeId::of::<T>())
    }

    #[must_use]
    pub fn descriptor_for(&self, type_id: TypeId) -> Option<&TypeDescriptor> {
        self.inner.by_rust_type.get(&type_id).map(|&idx| &self.inner.descriptors[idx])
    }

    /// Every registration, in registration order.
    #[must_use]
    pub fn descriptors(&self) -> &[TypeDescriptor] {
        &self.inner.descriptors
    }

    /// Namespaces known to the registry, longest first.
    #[must_use]
    pub fn known_namespaces(&self) -> &[String] {
        &self.inner.namespaces
    }

    #[must_use]
    pub fn default_namespace(&self) -> Option<&str> {
        self.inner.default_namespace.as_deref()
    }

    /// Prefix to use for `namespace` in prefix-based formats.
    ///
    /// The default namespace gets the empty prefix unless `require_prefix` is set; other
    /// namespaces get their registered prefix, or `None` when unknown.
    #[must_use]
    pub fn preferred_prefix(&self, namespace: &str, require_prefix: bool) -> Option<&str> {
        if !require_prefix && self.inner.default_namespace.as_deref() == Some(namespace) {
            return Some("");
        }
        self.inner.prefixes.get(namespace).map(String::as_str)
    }

    /// Canonical wire name for values of type `T`, if it is registered with a wrapper.
    #[must_use]
    pub fn wire_name_of<T: 'static>(&self) -> Option<&str> {
        self.resolve_by_type::<T>().and_then(TypeDescriptor::wire_name)
    }

    /// Decodes a wire property name: an exact registered wire name first, then the
    /// [`names`] decode chain over the known namespaces.
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidName`] for an empty candidate.
    pub fn decode_name(&self, candidate: &str) -> Result<QualifiedName, CodecError> {
        if let Some(wrapper) = self.resolve_by_wire_name(candidate).and_then(TypeDescriptor::wrapper) {
            return Ok(wrapper.clone());
        }
        names::decode(candidate, &self.inner.namespaces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    impl ModelType for Note {
        const NAMESPACE: &'static str = "http://example.org/ext/";
        const WRAPPER: Option<&'static str> = Some("notes");
        const PREFIX: Option<&'static str> = Some("ex");
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Other;

    impl ModelType for Other {
        const NAMESPACE: &'static str = "http://example.org/ext/";
        const WRAPPER: Option<&'static str> = Some("notes");
        const PREFIX: Option<&'static str> = Some("other");
    }

    #[test]
    fn test_registration_is_idempotent() {
        let registry = RegistryBuilder::new().register_type::<Note>().register_type::<Note>().build();
        assert_eq!(registry.descriptors().len(), 1);
    }

    #[test]
    fn test_first_claim_on_a_wire_name_wins() {
        let registry = RegistryBuilder::new().register_type::<Note>().register_type::<Other>().build();

        let resolved = registry.resolve_by_wire_name("http://example.org/ext/notes").unwrap();
        assert_eq!(resolved.type_id(), TypeId::of::<Note>());
        assert!(registry.resolve_by_type::<Other>().is_some());
        assert_eq!(registry.preferred_prefix("http://example.org/ext/", true), Some("ex"));
    }

    #[test]
    fn test_prefixes_respect_default_namespace() {
        let registry = RegistryBuilder::new()
            .register_type::<Note>()
            .default_namespace("http://example.org/ext/")
            .build();

        assert_eq!(registry.preferred_prefix("http://example.org/ext/", false), Some(""));
        assert_eq!(registry.preferred_prefix("http://example.org/ext/", true), Some("ex"));
        assert_eq!(registry.preferred_prefix(XML_NAMESPACE, false), Some("xml"));
        assert_eq!(registry.preferred_prefix("urn:unknown", false), None);
    }

    #[test]
    fn test_explicit_prefix_overrides_declared_one() {
        let registry = RegistryBuilder::new()
            .register_type::<Note>()
            .prefix("http://example.org/ext/", "notes")
            .build();
        assert_eq!(registry.preferred_prefix("http://example.org/ext/", true), Some("notes"));
    }

    #[test]
    fn test_decode_name_prefers_registered_wire_names() {
        let registry = RegistryBuilder::new().register_type::<Note>().build();

        let exact = registry.decode_name("http://example.org/ext/notes").unwrap();
        assert_eq!(exact.namespace(), "http://example.org/ext/");
        assert_eq!(exact.local_name(), "notes");

        let fallback = registry.decode_name("http://example.org/ext/x/y").unwrap();
        assert_eq!(fallback.namespace(), "http://example.org/ext/");
        assert_eq!(fallback.local_name(), "x/y");
    }
}
