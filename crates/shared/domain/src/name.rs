use serde::{Deserialize, Serialize};
use std::fmt;

/// The reserved namespace for attribute-style qualification (`xml:lang`, `xml:id`...).
///
/// Its URI has no trailing separator, so wire names built from it insert a `#` between the
/// namespace and the local name.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A `(namespace, local)` pair identifying an element or attribute kind.
///
/// The local part is never empty; the namespace may be (unqualified names). Deserialization
/// enforces the same rule as [`QualifiedName::new`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawQualifiedName")]
pub struct QualifiedName {
    namespace: String,
    local: String,
}

#[derive(Deserialize)]
struct RawQualifiedName {
    #[serde(default)]
    namespace: String,
    local: String,
}

impl TryFrom<RawQualifiedName> for QualifiedName {
    type Error = &'static str;

    fn try_from(raw: RawQualifiedName) -> Result<Self, Self::Error> {
        Self::new(raw.namespace, raw.local).ok_or("qualified name needs a non-empty local part")
    }
}

impl QualifiedName {
    /// Creates a qualified name, or `None` when `local` is empty.
    #[must_use]
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Option<Self> {
        let local = local.into();
        if local.is_empty() {
            return None;
        }
        Some(Self { namespace: namespace.into(), local })
    }

    /// Builds a name whose local part the caller already knows to be non-empty.
    pub(crate) fn from_parts(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        let local = local.into();
        debug_assert!(!local.is_empty(), "qualified names need a local part");
        Self { namespace: namespace.into(), local }
    }

    /// An unqualified name (empty namespace).
    #[must_use]
    pub fn local(local: impl Into<String>) -> Option<Self> {
        Self::new(String::new(), local)
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local
    }

    #[must_use]
    pub fn is_qualified(&self) -> bool {
        !self.namespace.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.namespace, self.local)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}
