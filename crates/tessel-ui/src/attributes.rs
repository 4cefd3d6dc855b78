//! Free-form attribute storage for element nodes.

use tessel_core::alloc::{OrderedMap, ordered_map};

/// Key/value store holding a node's free-form attributes.
///
/// The engine never serializes these wholesale. Each element kind opts into
/// the keys it exposes as markup attributes (see
/// [`ElementKind::attributes`](crate::kind::ElementKind::attributes)).
#[derive(Debug, Clone)]
pub struct AttributeStore {
    entries: OrderedMap<String, String>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self {
            entries: ordered_map(),
        }
    }

    /// Number of stored keys.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Linear scan for a value under any key.
    pub fn has_value(&self, value: &str) -> bool {
        self.entries.values().any(|v| v == value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or overwrite `key`.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Remove `key` if present.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.entries.shift_remove(key);
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeStore {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut store = Self::new();
        for (key, value) in iter {
            store.put(key, value);
        }
        store
    }
}
