//! Collection types used throughout Tessel.
//!
//! This module provides:
//! - Re-exports of hash collections using AHash
//! - An insertion-ordered map aliased to the same hasher

// Re-export optimized hash collections
pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

/// Insertion-ordered map hashed with AHash.
///
/// Used wherever iteration order is observable (attribute stores, widget
/// configuration) so that serialized output stays deterministic.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V, RandomState>;

/// Create an empty [`OrderedMap`].
pub fn ordered_map<K, V>() -> OrderedMap<K, V> {
    OrderedMap::with_hasher(RandomState::new())
}
