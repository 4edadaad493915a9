//! # Name Codec
//!
//! Pure conversion between [`QualifiedName`]s and the flat property names used by the
//! JSON wire format.
//!
//! Encoding concatenates namespace and local name. Namespace URIs normally end in a
//! separator (`/` or `#`), so nothing is inserted; the reserved [`XML_NAMESPACE`] does not,
//! and gets a `#` between the two parts.
//!
//! Decoding is a heuristic chain because wire names also come from other producers. The
//! strategies in [`DECODE_CHAIN`] run in order and the first match wins:
//!
//! 1. [`DecodeStrategy::KnownNamespace`] - longest known namespace that prefixes the
//!    candidate and leaves a non-empty local name.
//! 2. [`DecodeStrategy::FirstHash`] - split after the first `#`.
//! 3. [`DecodeStrategy::LastSlash`] - split after the last `/`.
//! 4. [`DecodeStrategy::Verbatim`] - no namespace, the whole candidate is the local name.
//!
//! Separators stay with the namespace, so every name produced by [`encode`] decodes back
//! to the same pair as long as its local part contains neither `#` nor `/`. A candidate
//! holding several separators is ambiguous (`a#b/c` could be `(a#, b/c)` or `(a#b/, c)`);
//! the chain picks the first reading and does not try to guess intent. The exact match
//! against registered wire names happens in the registry before this chain runs.

use crate::error::CodecError;
use gedx_domain::{QualifiedName, XML_NAMESPACE};

/// Separator inserted after [`XML_NAMESPACE`].
pub const RESERVED_SEPARATOR: char = '#';

/// One step of the decode chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    KnownNamespace,
    FirstHash,
    LastSlash,
    Verbatim,
}

/// The decode chain, in priority order.
pub const DECODE_CHAIN: [DecodeStrategy; 4] = [
    DecodeStrategy::KnownNamespace,
    DecodeStrategy::FirstHash,
    DecodeStrategy::LastSlash,
    DecodeStrategy::Verbatim,
];

/// Builds the wire name for `(namespace, local)`.
#[must_use]
pub fn encode(namespace: &str, local: &str) -> String {
    let mut out = String::with_capacity(namespace.len() + local.len() + 1);
    out.push_str(namespace);
    if namespace == XML_NAMESPACE {
        out.push(RESERVED_SEPARATOR);
    }
    out.push_str(local);
    out
}

#[must_use]
pub fn encode_name(name: &QualifiedName) -> String {
    encode(name.namespace(), name.local_name())
}

/// Decodes a wire name using the [`DECODE_CHAIN`].
///
/// [`XML_NAMESPACE`] is always treated as known.
///
/// # Errors
/// Returns [`CodecError::InvalidName`] for an empty candidate.
pub fn decode<S: AsRef<str>>(
    candidate: &str,
    known_namespaces: &[S],
) -> Result<QualifiedName, CodecError> {
    if candidate.is_empty() {
        return Err(CodecError::InvalidName {
            message: "wire name is empty".into(),
            context: None,
        });
    }

    DECODE_CHAIN
        .iter()
        .find_map(|strategy| strategy.apply(candidate, known_namespaces))
        .ok_or_else(|| CodecError::InvalidName {
            message: format!("no decoding for '{candidate}'").into(),
            context: None,
        })
}

impl DecodeStrategy {
    /// Runs this strategy alone; `None` when it does not apply.
    #[must_use]
    pub fn apply<S: AsRef<str>>(
        self,
        candidate: &str,
        known_namespaces: &[S],
    ) -> Option<QualifiedName> {
        match self {
            Self::KnownNamespace => known_namespace(candidate, known_namespaces),
            Self::FirstHash => candidate.find('#').and_then(|at| split_after(candidate, at)),
            Self::LastSlash => candidate.rfind('/').and_then(|at| split_after(candidate, at)),
            Self::Verbatim => QualifiedName::local(candidate),
        }
    }
}

fn known_namespace<S: AsRef<str>>(candidate: &str, known: &[S]) -> Option<QualifiedName> {
    known
        .iter()
        .map(AsRef::as_ref)
        .chain(std::iter::once(XML_NAMESPACE))
        .filter(|ns| !ns.is_empty())
        .filter_map(|ns| {
            let rest = candidate.strip_prefix(ns)?;
            let local = if ns == XML_NAMESPACE {
                rest.strip_prefix(RESERVED_SEPARATOR).unwrap_or(rest)
            } else {
                rest
            };
            (!local.is_empty()).then_some((ns, local))
        })
        .max_by_key(|(ns, _)| ns.len())
        .and_then(|(ns, local)| QualifiedName::new(ns, local))
}

/// Splits so the separator at byte `at` stays with the namespace.
fn split_after(candidate: &str, at: usize) -> Option<QualifiedName> {
    let (namespace, local) = candidate.split_at(at + 1);
    QualifiedName::new(namespace, local)
}
