//! Linear hashing table.
//!
//! The table starts with `mod1` home buckets. Each put that pushes the load
//! factor to 1.0 splits exactly one bucket (the one at the split pointer) and
//! appends one new bucket, so growth is spread evenly over inserts instead of
//! happening in one full rehash.
//!
//! A key's home bucket is `hash mod mod1`, unless that bucket has already been
//! split in the current generation (index below the split pointer), in which
//! case it is `hash mod mod2`. Once every bucket of a generation has been
//! split, `mod1` doubles and the split pointer returns to zero.

// Hash values are u64 but bucket indices are usize. The reduced value is
// always below the bucket count, which itself fits in usize.
#![allow(clippy::cast_possible_truncation)]

use std::fmt::{Debug, Write as _};
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use crate::config::{ConfigError, IndexConfig, validate_layout};
use crate::linhash::bucket::Bucket;
use crate::map::{DuplicateKey, Entries, KeyIndex};

/// Default hasher: CRC32, so placement is identical on every run.
pub type DefaultHashBuilder = BuildHasherDefault<crc32fast::Hasher>;

/// An unordered map backed by linear hashing.
///
/// Duplicate keys are not detected: putting a key twice stores two entries,
/// and lookups return the one stored first.
pub struct LinearHashMap<K, V, S = DefaultHashBuilder> {
    pub(crate) table: Vec<Bucket<K, V>>,
    pub(crate) slots: usize,
    pub(crate) mod1: usize,
    pub(crate) split: usize,
    pub(crate) len: usize,
    pub(crate) hash_builder: S,
}

impl<K: Hash + Eq, V> Default for LinearHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> LinearHashMap<K, V> {
    /// Create a table with the default layout: 8 home buckets of 10 slots.
    #[must_use]
    pub fn new() -> Self {
        Self::build(
            IndexConfig::DEFAULT_LINHASH_SLOTS,
            IndexConfig::DEFAULT_LINHASH_INITIAL_BUCKETS,
            DefaultHashBuilder::default(),
        )
    }

    /// Create a table with `initial_buckets` home buckets of `slots` slots.
    ///
    /// # Errors
    ///
    /// Returns an error if `slots` is zero or `initial_buckets` is not a
    /// power of two.
    pub fn with_layout(slots: usize, initial_buckets: usize) -> Result<Self, ConfigError> {
        Self::with_layout_and_hasher(slots, initial_buckets, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LinearHashMap<K, V, S> {
    /// Create a table with the default layout and a custom hasher.
    #[must_use]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::build(
            IndexConfig::DEFAULT_LINHASH_SLOTS,
            IndexConfig::DEFAULT_LINHASH_INITIAL_BUCKETS,
            hash_builder,
        )
    }

    /// Create a table with a custom layout and hasher.
    ///
    /// # Errors
    ///
    /// Returns an error if `slots` is zero or `initial_buckets` is not a
    /// power of two.
    pub fn with_layout_and_hasher(
        slots: usize,
        initial_buckets: usize,
        hash_builder: S,
    ) -> Result<Self, ConfigError> {
        validate_layout(slots, initial_buckets)?;
        Ok(Self::build(slots, initial_buckets, hash_builder))
    }

    fn build(slots: usize, initial_buckets: usize, hash_builder: S) -> Self {
        Self {
            table: (0..initial_buckets).map(|_| Bucket::new(slots)).collect(),
            slots,
            mod1: initial_buckets,
            split: 0,
            len: 0,
            hash_builder,
        }
    }

    /// Look up the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.table[self.home_index(key)].get(key)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert a key-value pair, splitting one bucket if the load factor
    /// reaches 1.0.
    ///
    /// The key is not checked for duplicates.
    pub fn put(&mut self, key: K, value: V) {
        self.len += 1;
        if self.len >= self.size() {
            self.split_and_insert(key, value);
        } else {
            self.insert(key, value);
        }
    }

    /// Slot capacity of the home buckets: `slots * (mod1 + split)`.
    ///
    /// This is not the number of stored entries; see [`Self::len`].
    #[must_use]
    pub const fn size(&self) -> usize {
        self.slots * (self.mod1 + self.split)
    }

    /// Number of stored entries, counting duplicates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the table holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of home buckets (`mod1 + split`).
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.table.len()
    }

    /// Index of the next bucket to split.
    #[must_use]
    pub const fn split_pointer(&self) -> usize {
        self.split
    }

    /// Bucket count of the current generation (`mod1`).
    #[must_use]
    pub const fn modulus(&self) -> usize {
        self.mod1
    }

    /// Slots per bucket.
    #[must_use]
    pub const fn slots(&self) -> usize {
        self.slots
    }

    /// Number of links in the chain of home bucket `bucket`, or `None` if
    /// there is no such bucket.
    #[must_use]
    pub fn chain_length(&self, bucket: usize) -> Option<usize> {
        self.table.get(bucket).map(Bucket::chain_length)
    }

    /// All entries, bucket by bucket, then link by link, then slot by slot.
    ///
    /// The order changes as buckets split.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.table.iter(),
            link: None,
            slot: 0,
        }
    }

    /// Render every home bucket and its overflow chain.
    #[must_use]
    pub fn dump(&self) -> String
    where
        K: Debug,
        V: Debug,
    {
        let mut out = String::from("Hash Table (Linear Hashing)\n");
        let _ = writeln!(
            out,
            "mod1 = {}, split = {}, entries = {}",
            self.mod1, self.split, self.len
        );
        for (i, bucket) in self.table.iter().enumerate() {
            let _ = write!(out, "Bucket {i}:");
            for link in bucket.chain() {
                out.push_str(" [");
                for (j, (k, v)) in link.entries.iter().enumerate() {
                    if j > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{k:?} => {v:?}");
                }
                out.push(']');
            }
            out.push('\n');
        }
        out
    }

    pub(crate) fn hash(&self, key: &K) -> u64 {
        self.hash_builder.hash_one(key)
    }

    /// Bucket that `hash` belongs to under the current split state.
    pub(crate) const fn home_of(&self, hash: u64) -> usize {
        let low = reduce(hash, self.mod1);
        if low < self.split {
            reduce(hash, self.mod2())
        } else {
            low
        }
    }

    fn home_index(&self, key: &K) -> usize {
        self.home_of(self.hash(key))
    }

    pub(crate) const fn mod2(&self) -> usize {
        2 * self.mod1
    }

    /// Place an entry in its home bucket chain.
    fn insert(&mut self, key: K, value: V) {
        let index = self.home_index(&key);
        let slots = self.slots;
        let bucket = &mut self.table[index];
        if bucket.insert(key, value, slots) {
            tracing::trace!(bucket = index, chain = bucket.chain_length(), "appended overflow bucket");
        }
    }

    /// Split the bucket at the split pointer, then re-insert its entries and
    /// the pending one under the advanced split state.
    fn split_and_insert(&mut self, key: K, value: V) {
        let target = self.split;
        self.table.push(Bucket::new(self.slots));

        let mut pending = Vec::new();
        self.table[target].drain_chain(&mut pending);
        pending.push((key, value));

        self.split += 1;
        if self.split == self.mod1 {
            self.mod1 *= 2;
            self.split = 0;
            tracing::debug!(
                modulus = self.mod1,
                buckets = self.table.len(),
                "linear hash generation rolled over"
            );
        }
        tracing::trace!(
            bucket = target,
            new_bucket = self.table.len() - 1,
            moved = pending.len(),
            "split bucket"
        );

        for (key, value) in pending {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> IntoIterator for &'a LinearHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over every stored entry of a [`LinearHashMap`].
pub struct Iter<'a, K, V> {
    buckets: std::slice::Iter<'a, Bucket<K, V>>,
    link: Option<&'a Bucket<K, V>>,
    slot: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(link) = self.link else {
                // Move to next home bucket
                self.link = Some(self.buckets.next()?);
                self.slot = 0;
                continue;
            };

            if let Some((key, value)) = link.entries.get(self.slot) {
                self.slot += 1;
                return Some((key, value));
            }

            // Next overflow link, or the next home bucket once the chain ends
            self.link = link.overflow.as_deref();
            self.slot = 0;
        }
    }
}

impl<K, V> std::iter::FusedIterator for Iter<'_, K, V> {}

const fn reduce(hash: u64, modulus: usize) -> usize {
    (hash % modulus as u64) as usize
}

impl<K: Hash + Eq, V, S: BuildHasher> KeyIndex<K, V> for LinearHashMap<K, V, S> {
    fn get(&self, key: &K) -> Option<&V> {
        Self::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Result<(), DuplicateKey<K>> {
        Self::put(self, key, value);
        Ok(())
    }

    fn size(&self) -> usize {
        Self::size(self)
    }

    fn entries(&self) -> Entries<'_, K, V> {
        Box::new(self.iter())
    }
}

impl<K, V, S> Debug for LinearHashMap<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearHashMap")
            .field("slots", &self.slots)
            .field("mod1", &self.mod1)
            .field("split", &self.split)
            .field("buckets", &self.table.len())
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
