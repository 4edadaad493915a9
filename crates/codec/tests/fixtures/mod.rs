#![allow(dead_code)]

use gedx_codec::prelude::*;
use gedx_derive::model_type;
use gedx_domain::{Extensibility, ExtensibilityMut, ExtensibilityRef};
use serde::{Deserialize, Serialize};

pub const EXT_NS: &str = "http://gedx.example.org/ext/";

#[model_type(namespace = "http://gedx.example.org/ext/", wrapper = "notes", prefix = "ex")]
#[derive(Clone, PartialEq)]
pub struct Note {
    pub text: String,
}

/// Keyed by address kind; one address per kind.
#[model_type(namespace = "http://gedx.example.org/ext/", wrapper = "addresses")]
#[derive(Clone, PartialEq)]
pub struct Address {
    #[serde(skip)]
    pub kind: Option<String>,
    pub city: String,
}

impl Keyed for Address {
    fn key(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    fn set_key(&mut self, key: Option<String>) {
        self.kind = key;
    }

    fn is_key_unique(&self) -> bool {
        true
    }
}

/// Keyed by relation; any number of links per relation.
#[model_type(namespace = "http://gedx.example.org/ext/", wrapper = "links")]
#[derive(Clone, PartialEq)]
pub struct Link {
    #[serde(skip)]
    pub rel: Option<String>,
    pub href: String,
}

impl Keyed for Link {
    fn key(&self) -> Option<&str> {
        self.rel.as_deref()
    }

    fn set_key(&mut self, key: Option<String>) {
        self.rel = key;
    }
}

/// No wrapper: written under its type identifier.
#[model_type(namespace = "http://gedx.example.org/ext/", name = "rating")]
#[derive(Clone, PartialEq)]
pub struct Rating {
    pub stars: u8,
}

/// A host open to extension elements and attributes.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extensions: ExtensionData,
}

impl ExtensionHost for Person {
    fn extensibility(&self) -> ExtensibilityRef<'_> {
        self.extensions.as_both()
    }

    fn extensibility_mut(&mut self) -> ExtensibilityMut<'_> {
        self.extensions.as_both_mut()
    }

    fn take_unrecognized(&mut self) -> serde_json::Map<String, serde_json::Value> {
        self.extensions.take_unrecognized()
    }
}

/// A host that takes no extensions at all.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Sealed {
    pub id: String,
}

impl ExtensionHost for Sealed {
    fn extensibility(&self) -> ExtensibilityRef<'_> {
        Extensibility::Neither
    }

    fn extensibility_mut(&mut self) -> ExtensibilityMut<'_> {
        Extensibility::Neither
    }
}

pub fn address(kind: Option<&str>, city: &str) -> Address {
    Address { kind: kind.map(str::to_owned), city: city.to_owned() }
}

pub fn link(rel: Option<&str>, href: &str) -> Link {
    Link { rel: rel.map(str::to_owned), href: href.to_owned() }
}

pub fn wire(local: &str) -> String {
    format!("{EXT_NS}{local}")
}

#[must_use]
pub fn catalogue() -> Catalogue {
    Catalogue::new()
        .with(TypeDescriptor::of::<Note>())
        .with(TypeDescriptor::keyed::<Address>())
        .with(TypeDescriptor::keyed::<Link>())
        .with(TypeDescriptor::of::<Rating>())
}

#[must_use]
pub fn registry() -> NameRegistry {
    RegistryBuilder::new()
        .register_type::<Note>()
        .register_keyed::<Address>()
        .register_keyed::<Link>()
        .register_type::<Rating>()
        .build()
}
