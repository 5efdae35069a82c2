//! The map contract shared by every index engine.
//!
//! A table holds at most one index and talks to it only through these traits:
//! - [`KeyIndex`]: point lookup, insertion, size and full enumeration
//! - [`OrderedIndex`]: first/last key and half-open range scans
//!
//! Only the B+Tree (and the reference `BTreeMap` wrapper in
//! [`crate::primary`]) is ordered. Asking an unordered engine for a range is a
//! caller bug; use [`KeyIndex::as_ordered`] to check the capability first.

use std::fmt;

/// Borrowed `(key, value)` pairs yielded by an index scan.
pub type Entries<'a, K, V> = Box<dyn Iterator<Item = (&'a K, &'a V)> + 'a>;

/// Point access and enumeration over a primary-key index.
pub trait KeyIndex<K, V> {
    /// Look up the value stored under `key`.
    fn get(&self, key: &K) -> Option<&V>;

    /// Insert a key-value pair.
    ///
    /// Engines that reject duplicates hand the key back in [`DuplicateKey`]
    /// and leave the index unchanged.
    fn put(&mut self, key: K, value: V) -> Result<(), DuplicateKey<K>>;

    /// Engine-defined size figure.
    ///
    /// The B+Tree reports its exact key count. Linear hashing reports slot
    /// capacity; see [`crate::linhash::LinearHashMap::size`].
    fn size(&self) -> usize;

    /// Every stored pair, in the engine's natural scan order.
    fn entries(&self) -> Entries<'_, K, V>;

    /// The ordered view of this index, if the engine keeps keys sorted.
    fn as_ordered(&self) -> Option<&dyn OrderedIndex<K, V>> {
        None
    }

    /// Whether range operations are available.
    fn is_ordered(&self) -> bool {
        self.as_ordered().is_some()
    }
}

/// An index that keeps its keys in ascending order.
pub trait OrderedIndex<K, V>: KeyIndex<K, V> {
    /// Smallest key, or `None` when empty.
    fn first_key(&self) -> Option<&K>;

    /// Largest key, or `None` when empty.
    fn last_key(&self) -> Option<&K>;

    /// Pairs with `from <= key < to`, ascending.
    fn range<'a>(&'a self, from: &K, to: &K) -> Entries<'a, K, V>;
}

/// A put was rejected because the key is already present.
///
/// The index is unchanged. The rejected key is handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey<K> {
    /// The key that was already present.
    pub key: K,
}

impl<K> DuplicateKey<K> {
    /// Recover the rejected key.
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<K: fmt::Debug> fmt::Display for DuplicateKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate key: {:?}", self.key)
    }
}

impl<K: fmt::Debug> std::error::Error for DuplicateKey<K> {}
