//! Fixed-capacity buckets with overflow chains.

/// One link of a bucket chain.
///
/// Holds at most `slots` entries in insertion order. When full, further
/// entries go to the overflow bucket, which is created on demand.
pub(crate) struct Bucket<K, V> {
    pub(crate) entries: Vec<(K, V)>,
    pub(crate) overflow: Option<Box<Self>>,
}

impl<K, V> Bucket<K, V> {
    pub(crate) fn new(slots: usize) -> Self {
        Self {
            entries: Vec::with_capacity(slots),
            overflow: None,
        }
    }

    /// This bucket followed by its overflow buckets.
    pub(crate) fn chain(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |bucket| bucket.overflow.as_deref())
    }

    pub(crate) fn chain_length(&self) -> usize {
        self.chain().count()
    }

    /// Every entry along the chain, link by link, slot by slot.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.chain()
            .flat_map(|bucket| bucket.entries.iter().map(|(k, v)| (k, v)))
    }

    /// First value stored under `key` along the chain.
    pub(crate) fn get(&self, key: &K) -> Option<&V>
    where
        K: Eq,
    {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Place an entry in the first link with a free slot.
    ///
    /// Returns `true` if the chain was full and a new overflow bucket was
    /// appended to hold the entry.
    pub(crate) fn insert(&mut self, key: K, value: V, slots: usize) -> bool {
        let mut appended = false;
        let mut bucket = self;
        while bucket.entries.len() >= slots {
            bucket = &mut **bucket.overflow.get_or_insert_with(|| {
                appended = true;
                Box::new(Self::new(slots))
            });
        }
        bucket.entries.push((key, value));
        appended
    }

    /// Move every entry along the chain into `out` and drop the overflow
    /// buckets, leaving this bucket empty.
    pub(crate) fn drain_chain(&mut self, out: &mut Vec<(K, V)>) {
        out.append(&mut self.entries);
        let mut next = self.overflow.take();
        while let Some(mut bucket) = next {
            out.append(&mut bucket.entries);
            next = bucket.overflow.take();
        }
    }
}

impl<K, V> Drop for Bucket<K, V> {
    fn drop(&mut self) {
        // Unlink iteratively so long chains do not recurse.
        let mut next = self.overflow.take();
        while let Some(mut bucket) = next {
            next = bucket.overflow.take();
        }
    }
}
