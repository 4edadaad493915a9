//! Keyed items: values written as `key -> item` entries of a JSON object.

/// The key used on the wire for items that carry no key of their own.
///
/// Decoding maps it back to "no key", so an item whose key is literally `"$"` cannot be
/// told apart from an unkeyed one.
pub const DEFAULT_KEY: &str = "$";

/// An item that can be grouped under a string key.
///
/// The key is owned by the item; codecs move it in and out of the encoded object key and
/// never keep their own copy. Implementors usually exclude the key from their serde
/// representation (`#[serde(skip)]`) because the object key already carries it.
pub trait Keyed {
    fn key(&self) -> Option<&str>;

    fn set_key(&mut self, key: Option<String>);

    /// Whether at most one item may use this item's key.
    ///
    /// A unique item alone under its key is written bare instead of in an array.
    fn is_key_unique(&self) -> bool {
        false
    }

    /// Called on decode with whether the item was found bare under its key.
    ///
    /// Types with a fixed uniqueness ignore it; untyped items use it to re-encode in the
    /// same shape.
    fn set_key_unique(&mut self, _unique: bool) {}
}
