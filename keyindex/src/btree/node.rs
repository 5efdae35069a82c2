//! B+Tree node types.
//!
//! Nodes live in the tree's arena and refer to each other by [`NodeId`]:
//! - Internal nodes: divider keys and child ids
//! - Leaf nodes: key-value entries and a forward link to the next leaf
//!
//! A divider key is the largest key in the subtree to its left, so
//! `child[i]` holds keys `<= keys[i]` and `child[i + 1]` holds keys `> keys[i]`.

use crate::map::DuplicateKey;

/// Position of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The first leaf is allocated with the tree and never moves.
    pub(crate) const FIRST_LEAF: Self = Self(0);

    /// Arena slot of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Number of entries the left half keeps on a split: `ceil(order / 2)`.
#[must_use]
pub(crate) const fn split_point(order: usize) -> usize {
    order.div_ceil(2)
}

/// A B+Tree node.
#[derive(Debug)]
pub(crate) enum Node<K, V> {
    Internal(InternalNode<K>),
    Leaf(LeafNode<K, V>),
}

impl<K, V> Node<K, V> {
    /// The node as a leaf, if it is one.
    pub(crate) const fn as_leaf(&self) -> Option<&LeafNode<K, V>> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Internal(_) => None,
        }
    }

    /// Keys currently held by the node.
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub(crate) fn key_count(&self) -> usize {
        match self {
            Self::Internal(node) => node.keys.len(),
            Self::Leaf(leaf) => leaf.entries.len(),
        }
    }
}

/// An internal (non-leaf) B+Tree node.
///
/// Stores N divider keys and N+1 child ids.
#[derive(Debug)]
pub(crate) struct InternalNode<K> {
    /// Divider keys in strictly increasing order.
    pub(crate) keys: Vec<K>,
    /// Child ids. `children.len()` == `keys.len()` + 1
    pub(crate) children: Vec<NodeId>,
}

impl<K: Ord> InternalNode<K> {
    /// Create the single-divider node that becomes a new root.
    #[must_use]
    pub(crate) fn with_children(left_child: NodeId, divider: K, right_child: NodeId) -> Self {
        Self {
            keys: vec![divider],
            children: vec![left_child, right_child],
        }
    }

    /// Find the child that covers `key`.
    ///
    /// This is the position of the first divider `>= key`, or the rightmost
    /// child when every divider is smaller.
    #[must_use]
    pub(crate) fn find_child_index(&self, key: &K) -> usize {
        self.keys.partition_point(|divider| divider < key)
    }

    /// Check if the node is full.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub(crate) fn is_full(&self, order: usize) -> bool {
        self.keys.len() >= order - 1
    }

    /// Record that `children[at]` split, with `right_child` as its new right sibling.
    ///
    /// The divider lands at `keys[at]` and the sibling to its right.
    pub(crate) fn wedge(&mut self, at: usize, divider: K, right_child: NodeId) {
        self.keys.insert(at, divider);
        self.children.insert(at + 1, right_child);
    }

    /// Wedge a child split into a full node and split the result.
    ///
    /// The node keeps the first `ceil(order / 2)` children. The key between the
    /// halves is promoted and returned with the new right node; it is the
    /// largest key reachable from the left half.
    #[must_use]
    pub(crate) fn split_insert(
        &mut self,
        at: usize,
        divider: K,
        right_child: NodeId,
        order: usize,
    ) -> (K, Self) {
        let mid = split_point(order);

        // Over-capacity scratch copy: order keys, order + 1 children.
        let mut scratch = Self {
            keys: std::mem::replace(&mut self.keys, Vec::with_capacity(order - 1)),
            children: std::mem::replace(&mut self.children, Vec::with_capacity(order)),
        };
        scratch.wedge(at, divider, right_child);

        let right_keys = scratch.keys.split_off(mid);
        let right_children = scratch.children.split_off(mid);
        // order >= 3 keeps at least one key on each side
        let promoted = scratch.keys.swap_remove(mid - 1);

        self.keys.append(&mut scratch.keys);
        self.children.append(&mut scratch.children);

        let right = Self {
            keys: right_keys,
            children: right_children,
        };

        (promoted, right)
    }
}

/// A leaf B+Tree node.
///
/// Stores key-value entries and links to the next leaf.
#[derive(Debug)]
pub(crate) struct LeafNode<K, V> {
    /// Entries in sorted order by key.
    pub(crate) entries: Vec<LeafEntry<K, V>>,
    /// The leaf to the right, `None` for the last leaf.
    pub(crate) next_leaf: Option<NodeId>,
}

/// A key-value entry in a leaf node.
#[derive(Debug)]
pub(crate) struct LeafEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K: Ord, V> LeafNode<K, V> {
    /// Create a new empty leaf node.
    #[must_use]
    pub(crate) fn new(order: usize) -> Self {
        Self {
            entries: Vec::with_capacity(order - 1),
            next_leaf: None,
        }
    }

    /// Check if the node is full.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub(crate) fn is_full(&self, order: usize) -> bool {
        self.entries.len() >= order - 1
    }

    /// Find the index where a key should be inserted (or exists).
    pub(crate) fn find_index(&self, key: &K) -> Result<usize, usize> {
        self.entries.binary_search_by(|e| e.key.cmp(key))
    }

    /// Get a value by key.
    #[must_use]
    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.find_index(key).ok().map(|i| &self.entries[i].value)
    }

    /// Largest key in the leaf.
    #[must_use]
    pub(crate) fn last_key(&self) -> Option<&K> {
        self.entries.last().map(|e| &e.key)
    }

    /// Insert an entry at its sorted position, shifting later entries right.
    ///
    /// Existing keys are never overwritten.
    pub(crate) fn wedge(&mut self, key: K, value: V) -> Result<(), DuplicateKey<K>> {
        wedge_entry(&mut self.entries, key, value)
    }

    /// Insert into a full leaf and split it.
    ///
    /// The new entry is wedged into a scratch copy holding `order` entries. The
    /// first `ceil(order / 2)` stay here and the rest move to the returned
    /// right sibling, which `self` now links to as `sibling_id`. On a
    /// duplicate nothing changes. Returns the divider (the largest key left
    /// behind) and the sibling.
    pub(crate) fn split_insert(
        &mut self,
        key: K,
        value: V,
        order: usize,
        sibling_id: NodeId,
    ) -> Result<(K, Self), DuplicateKey<K>>
    where
        K: Clone,
    {
        let mid = split_point(order);

        let mut scratch = std::mem::replace(&mut self.entries, Vec::with_capacity(order - 1));
        scratch.reserve_exact(1);
        if let Err(duplicate) = wedge_entry(&mut scratch, key, value) {
            self.entries = scratch;
            return Err(duplicate);
        }

        let right_entries = scratch.split_off(mid);
        self.entries.append(&mut scratch);

        let divider = self.entries[mid - 1].key.clone();

        let right = Self {
            entries: right_entries,
            next_leaf: self.next_leaf.replace(sibling_id),
        };

        Ok((divider, right))
    }
}

/// Wedge `(key, value)` into a sorted entry run.
fn wedge_entry<K: Ord, V>(
    entries: &mut Vec<LeafEntry<K, V>>,
    key: K,
    value: V,
) -> Result<(), DuplicateKey<K>> {
    match entries.binary_search_by(|e| e.key.cmp(&key)) {
        Ok(_) => Err(DuplicateKey { key }),
        Err(i) => {
            entries.insert(i, LeafEntry { key, value });
            Ok(())
        }
    }
}
