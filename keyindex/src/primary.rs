//! Primary-key index selection for a table.
//!
//! A table owns zero or one primary index, chosen by [`IndexKind`] when the
//! table is created. The table talks to the index only through this type, so
//! it never depends on engine internals.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::btree::BPlusTreeMap;
use crate::config::{ConfigError, IndexConfig, IndexKind};
use crate::linhash::LinearHashMap;
use crate::map::{DuplicateKey, Entries, KeyIndex, OrderedIndex};

/// The primary index of one table.
pub enum PrimaryIndex<K, V> {
    /// No index; lookups fall back to scanning the table.
    None,
    /// Standard library ordered map, used as the reference engine.
    Tree(BTreeMap<K, V>),
    /// Linear hashing.
    LinearHash(LinearHashMap<K, V>),
    /// B+Tree.
    BPlusTree(BPlusTreeMap<K, V>),
}

impl<K, V> PrimaryIndex<K, V>
where
    K: Ord + Hash + Clone + Debug,
{
    /// Build an empty index of the configured kind and shape.
    pub fn from_config(config: &IndexConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let index = match config.kind {
            IndexKind::None => Self::None,
            IndexKind::Tree => Self::Tree(BTreeMap::new()),
            IndexKind::LinearHash => Self::LinearHash(LinearHashMap::with_layout(
                config.linhash_slots,
                config.linhash_initial_buckets,
            )?),
            IndexKind::BPlusTree => Self::BPlusTree(BPlusTreeMap::with_order(config.bptree_order)?),
        };
        tracing::debug!(kind = %config.kind, "created primary index");
        Ok(index)
    }

    /// Which engine backs this index.
    #[must_use]
    pub const fn kind(&self) -> IndexKind {
        match self {
            Self::None => IndexKind::None,
            Self::Tree(_) => IndexKind::Tree,
            Self::LinearHash(_) => IndexKind::LinearHash,
            Self::BPlusTree(_) => IndexKind::BPlusTree,
        }
    }

    /// The engine behind the map contract, or `None` if there is no index.
    #[must_use]
    pub fn index(&self) -> Option<&dyn KeyIndex<K, V>> {
        match self {
            Self::None => None,
            Self::Tree(map) => Some(map),
            Self::LinearHash(table) => Some(table),
            Self::BPlusTree(tree) => Some(tree),
        }
    }

    /// Mutable access to the engine behind the map contract.
    pub fn index_mut(&mut self) -> Option<&mut dyn KeyIndex<K, V>> {
        match self {
            Self::None => None,
            Self::Tree(map) => Some(map),
            Self::LinearHash(table) => Some(table),
            Self::BPlusTree(tree) => Some(tree),
        }
    }

    /// Key selection: the value stored under `key`.
    ///
    /// Always `None` without an index; the caller scans instead.
    #[must_use]
    pub fn lookup(&self, key: &K) -> Option<&V> {
        self.index()?.get(key)
    }

    /// Record a new row under `key`.
    ///
    /// Without an index this does nothing and succeeds.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), DuplicateKey<K>> {
        self.index_mut()
            .map_or(Ok(()), |index| index.put(key, value))
    }

    /// Rows with `from <= key < to` in key order, or `None` if the index
    /// cannot answer range queries.
    #[must_use]
    pub fn range(&self, from: &K, to: &K) -> Option<Vec<(&K, &V)>> {
        let ordered = self.index()?.as_ordered()?;
        Some(ordered.range(from, to).collect())
    }
}

impl<K, V> Debug for PrimaryIndex<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("PrimaryIndex::None"),
            Self::Tree(map) => write!(f, "PrimaryIndex::Tree({} keys)", map.len()),
            Self::LinearHash(table) => write!(f, "PrimaryIndex::LinearHash({table:?})"),
            Self::BPlusTree(tree) => write!(f, "PrimaryIndex::BPlusTree({tree:?})"),
        }
    }
}

/// `BTreeMap` under the map contract. Duplicates are rejected rather than
/// overwritten, matching the B+Tree.
impl<K: Ord + Clone, V> KeyIndex<K, V> for BTreeMap<K, V> {
    fn get(&self, key: &K) -> Option<&V> {
        Self::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Result<(), DuplicateKey<K>> {
        use std::collections::btree_map::Entry;

        match self.entry(key) {
            Entry::Occupied(entry) => Err(DuplicateKey {
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn entries(&self) -> Entries<'_, K, V> {
        Box::new(self.iter())
    }

    fn as_ordered(&self) -> Option<&dyn OrderedIndex<K, V>> {
        Some(self)
    }
}

impl<K: Ord + Clone, V> OrderedIndex<K, V> for BTreeMap<K, V> {
    fn first_key(&self) -> Option<&K> {
        self.keys().next()
    }

    fn last_key(&self) -> Option<&K> {
        self.keys().next_back()
    }

    fn range<'a>(&'a self, from: &K, to: &K) -> Entries<'a, K, V> {
        // BTreeMap::range panics on inverted bounds
        if from >= to {
            return Box::new(std::iter::empty());
        }
        Box::new(Self::range(self, from.clone()..to.clone()))
    }
}
