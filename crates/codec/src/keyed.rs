//! # Keyed Collection Codec
//!
//! Writes a sequence of [`Keyed`] items as a JSON object keyed by item key instead of an
//! array.
//!
//! Items are grouped by key in first-seen order; items without a key go under
//! [`DEFAULT_KEY`]. A group holding exactly one item whose key is unique is written bare
//! (`"home": {...}`), every other group as an array (`"home": [{...}, {...}]`). A group of
//! several items is rejected if any of them declares its key unique. The result is always
//! an object, even for a single group.
//!
//! Decoding walks the object in order (`serde_json` keeps insertion order here), decodes
//! every array element or the bare value, and hands the object key back to each item.

use crate::error::{CodecError, CodecErrorExt};
use gedx_domain::{DEFAULT_KEY, Keyed};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One item in erased form: its key, its uniqueness flag and its wire value.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedEntry {
    pub key: Option<String>,
    pub unique: bool,
    pub value: Value,
}

impl KeyedEntry {
    /// Serializes `item` and captures its key metadata.
    ///
    /// # Errors
    /// Propagates the item's serialization failure.
    pub fn of<T: Keyed + Serialize + ?Sized>(item: &T) -> Result<Self, CodecError> {
        Ok(Self {
            key: item.key().map(str::to_owned),
            unique: item.is_key_unique(),
            value: serde_json::to_value(item)?,
        })
    }
}

/// Encodes `items` as an object keyed by item key.
///
/// # Errors
/// Returns [`CodecError::UniquenessViolation`] when a group of several items contains a
/// unique one, or [`CodecError::Json`] if an item fails to serialize.
pub fn encode<'a, T, I>(items: I) -> Result<Map<String, Value>, CodecError>
where
    T: Keyed + Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let entries = items.into_iter().map(KeyedEntry::of).collect::<Result<Vec<_>, _>>()?;
    encode_entries(entries)
}

/// Encodes already-serialized entries.
///
/// # Errors
/// Returns [`CodecError::UniquenessViolation`] when a group of several entries contains a
/// unique one.
pub fn encode_entries(
    entries: impl IntoIterator<Item = KeyedEntry>,
) -> Result<Map<String, Value>, CodecError> {
    let mut groups: IndexMap<String, Vec<KeyedEntry>> = IndexMap::new();
    for entry in entries {
        let key = entry.key.clone().unwrap_or_else(|| DEFAULT_KEY.to_owned());
        groups.entry(key).or_default().push(entry);
    }

    let mut out = Map::with_capacity(groups.len());
    for (key, mut group) in groups {
        let value = match group.len() {
            1 if group[0].unique => group.swap_remove(0).value,
            count if count > 1 && group.iter().any(|entry| entry.unique) => {
                return Err(CodecError::UniquenessViolation { key, count, context: None });
            },
            _ => Value::Array(group.into_iter().map(|entry| entry.value).collect()),
        };
        out.insert(key, value);
    }

    Ok(out)
}

/// Decodes a keyed object back into items, restoring each item's key.
///
/// # Errors
/// Returns [`CodecError::MalformedKeyedInput`] if `value` is not an object and
/// [`CodecError::Json`] if an item does not match `T`.
pub fn decode<T>(value: Value) -> Result<Vec<T>, CodecError>
where
    T: Keyed + DeserializeOwned,
{
    match value {
        Value::Object(map) => decode_map(map),
        other => Err(CodecError::MalformedKeyedInput {
            message: format!("expected an object of keyed items, found {}", kind(&other)).into(),
            context: None,
        }),
    }
}

/// Decodes the entries of a keyed object in iteration order.
///
/// # Errors
/// Returns [`CodecError::Json`] if an item does not match `T`.
pub fn decode_map<T>(map: Map<String, Value>) -> Result<Vec<T>, CodecError>
where
    T: Keyed + DeserializeOwned,
{
    let mut items = Vec::with_capacity(map.len());

    for (key, value) in map {
        let (values, bare) = match value {
            Value::Array(values) => (values, false),
            single => (vec![single], true),
        };

        for value in values {
            let mut item: T = serde_json::from_value(value)
                .context(format!("Decoding keyed group '{key}'"))?;
            if key != DEFAULT_KEY {
                item.set_key(Some(key.clone()));
            }
            item.set_key_unique(bare);
            items.push(item);
        }
    }

    Ok(items)
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `#[serde(with = "gedx_codec::keyed::as_object")]` for `Vec<T>` fields of keyed items.
pub mod as_object {
    use super::{Keyed, decode_map, encode};
    use serde::de::{self, DeserializeOwned, MapAccess, Visitor};
    use serde::ser;
    use serde::{Deserializer, Serialize, Serializer};
    use serde_json::{Map, Value};
    use std::fmt;
    use std::marker::PhantomData;
    use tracing::warn;

    /// Writes the items as a keyed object.
    ///
    /// # Errors
    /// Fails on a key uniqueness violation or an item serialization failure.
    pub fn serialize<T, S>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Keyed + Serialize,
        S: Serializer,
    {
        encode(items).map_err(<S::Error as ser::Error>::custom)?.serialize(serializer)
    }

    /// Reads a keyed object back into items.
    ///
    /// # Errors
    /// Fails when the input is not a map or an item does not match `T`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: Keyed + DeserializeOwned,
        D: Deserializer<'de>,
    {
        struct KeyedVisitor<T>(PhantomData<T>);

        impl<'de, T: Keyed + DeserializeOwned> Visitor<'de> for KeyedVisitor<T> {
            type Value = Vec<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of keyed items (malformed keyed input)")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut map = Map::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    if let Some(replaced) = map.insert(key, value) {
                        let dropped = replaced.as_array().map_or(1, Vec::len);
                        warn!(dropped, "Duplicate keyed group, keeping the last occurrence");
                    }
                }
                decode_map(map).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(KeyedVisitor(PhantomData))
    }
}

/// A keyed item of unknown type: any JSON value plus its key metadata.
///
/// Only the value is serialized; the key lives in the enclosing object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyedItem {
    pub key: Option<String>,
    pub unique: bool,
    pub value: Value,
}

impl RawKeyedItem {
    #[must_use]
    pub const fn new(key: Option<String>, unique: bool, value: Value) -> Self {
        Self { key, unique, value }
    }
}

impl Keyed for RawKeyedItem {
    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn set_key(&mut self, key: Option<String>) {
        self.key = key;
    }

    fn is_key_unique(&self) -> bool {
        self.unique
    }

    fn set_key_unique(&mut self, unique: bool) {
        self.unique = unique;
    }
}

impl Serialize for RawKeyedItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawKeyedItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self { key: None, unique: false, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(key: Option<&str>, unique: bool, value: Value) -> RawKeyedItem {
        RawKeyedItem::new(key.map(str::to_owned), unique, value)
    }

    #[test]
    fn test_single_unique_item_is_bare() {
        let map = encode(&[item(Some("home"), true, json!({ "city": "Provo" }))]).unwrap();
        assert_eq!(Value::Object(map), json!({ "home": { "city": "Provo" } }));
    }

    #[test]
    fn test_single_non_unique_item_is_an_array() {
        let map = encode(&[item(Some("home"), false, json!(1))]).unwrap();
        assert_eq!(Value::Object(map), json!({ "home": [1] }));
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let items = [
            item(Some("b"), false, json!(1)),
            item(None, false, json!(2)),
            item(Some("b"), false, json!(3)),
            item(Some("a"), true, json!(4)),
        ];
        let map = encode(&items).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "$", "a"]);
        assert_eq!(map["b"], json!([1, 3]));
        assert_eq!(map["a"], json!(4));
    }

    #[test]
    fn test_shared_unique_key_is_rejected() {
        let items = [item(Some("k"), true, json!(1)), item(Some("k"), false, json!(2))];
        let err = encode(&items).unwrap_err();
        assert!(matches!(err, CodecError::UniquenessViolation { ref key, count: 2, .. } if key == "k"));
    }

    #[test]
    fn test_decode_restores_keys_and_shape() {
        let items: Vec<RawKeyedItem> =
            decode(json!({ "home": { "x": 1 }, "$": [2, 3], "k": [4] })).unwrap();

        assert_eq!(items.len(), 4);
        assert_eq!(items[0], item(Some("home"), true, json!({ "x": 1 })));
        assert_eq!(items[1], item(None, false, json!(2)));
        assert_eq!(items[3], item(Some("k"), false, json!(4)));
    }

    #[test]
    fn test_non_object_input_is_malformed() {
        let err = decode::<RawKeyedItem>(json!([1, 2])).unwrap_err();
        assert!(matches!(err, CodecError::MalformedKeyedInput { .. }));
        assert!(err.to_string().contains("an array"));
    }
}
