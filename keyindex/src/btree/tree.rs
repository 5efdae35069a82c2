//! In-memory B+Tree map.
//!
//! All entries live in leaves; leaves are linked left to right so ordered
//! scans never revisit internal nodes. Nodes are stored in an append-only
//! arena and addressed by [`NodeId`]. Nothing is ever freed because keys
//! cannot be removed.

use std::fmt::{Debug, Write as _};
use std::ops::Bound;

use crate::btree::iter::Iter;
use crate::btree::node::{InternalNode, LeafNode, Node, NodeId};
use crate::config::{ConfigError, IndexConfig, validate_order};
use crate::map::{DuplicateKey, Entries, KeyIndex, OrderedIndex};

/// Result of inserting below a node.
///
/// A split is handed back to the caller instead of being recorded on the tree,
/// so each level decides for itself whether it absorbs the split or splits too.
#[derive(Debug)]
enum InsertOutcome<K> {
    /// The subtree absorbed the entry.
    NoSplit,
    /// The child split; `sibling` is its new right neighbour and `divider` the
    /// largest key remaining in the child.
    Split { divider: K, sibling: NodeId },
}

/// An ordered map backed by a B+Tree.
pub struct BPlusTreeMap<K, V> {
    pub(crate) nodes: Vec<Node<K, V>>,
    pub(crate) root: NodeId,
    pub(crate) order: usize,
    pub(crate) len: usize,
}

impl<K: Ord + Clone, V> Default for BPlusTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V> BPlusTreeMap<K, V> {
    /// Create an empty tree with the default order.
    #[must_use]
    pub fn new() -> Self {
        Self::build(IndexConfig::DEFAULT_BPTREE_ORDER)
    }

    /// Create an empty tree whose nodes hold at most `order` children.
    ///
    /// # Errors
    ///
    /// Returns an error if `order` is below 3.
    pub fn with_order(order: usize) -> Result<Self, ConfigError> {
        validate_order(order)?;
        Ok(Self::build(order))
    }

    fn build(order: usize) -> Self {
        // The root starts as the first leaf and that leaf never moves.
        Self {
            nodes: vec![Node::Leaf(LeafNode::new(order))],
            root: NodeId::FIRST_LEAF,
            order,
            len: 0,
        }
    }

    /// Maximum number of children per node.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Number of keys in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find_leaf(key).get(key)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert a key-value pair.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKey`] if the key is already present; the existing
    /// value is kept and the tree is unchanged.
    pub fn put(&mut self, key: K, value: V) -> Result<(), DuplicateKey<K>>
    where
        K: Debug,
    {
        match self.insert(self.root, key, value) {
            Ok(InsertOutcome::NoSplit) => {}
            Ok(InsertOutcome::Split { divider, sibling }) => self.grow_root(divider, sibling),
            Err(duplicate) => {
                tracing::debug!(key = ?duplicate.key, "rejected duplicate key");
                return Err(duplicate);
            }
        }
        self.len += 1;
        Ok(())
    }

    /// Smallest key, or `None` if the tree is empty.
    #[must_use]
    pub fn first_key(&self) -> Option<&K> {
        self.first_leaf()
            .and_then(|leaf| leaf.entries.first())
            .map(|e| &e.key)
    }

    /// Largest key, found by following the rightmost child at every level.
    #[must_use]
    pub fn last_key(&self) -> Option<&K> {
        let mut current = self.root;
        loop {
            match &self.nodes[current.index()] {
                Node::Leaf(leaf) => return leaf.last_key(),
                Node::Internal(node) => current = *node.children.last()?,
            }
        }
    }

    /// All entries in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.first_leaf(), 0, Bound::Unbounded)
    }

    /// Entries with `from <= key < to`, in ascending key order.
    #[must_use]
    pub fn range(&self, from: &K, to: &K) -> Iter<'_, K, V> {
        if from >= to {
            return Iter::empty(&self.nodes);
        }
        self.seek(from, Bound::Excluded(to.clone()))
    }

    /// Entries with `key < to` (head map).
    #[must_use]
    pub fn range_to(&self, to: &K) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.first_leaf(), 0, Bound::Excluded(to.clone()))
    }

    /// Entries with `from <= key` (tail map).
    #[must_use]
    pub fn range_from(&self, from: &K) -> Iter<'_, K, V> {
        self.seek(from, Bound::Unbounded)
    }

    /// Number of levels, counting the leaf level.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let Node::Internal(node) = &self.nodes[current.index()] {
            current = node.children[0];
            height += 1;
        }
        height
    }

    /// Number of leaves on the leaf chain.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Render the tree pre-order, one node per line, indented by level.
    #[must_use]
    pub fn dump(&self) -> String
    where
        K: Debug,
    {
        let mut out = String::from("BPlusTreeMap\n");
        self.dump_node(self.root, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, level: usize, out: &mut String)
    where
        K: Debug,
    {
        let node = &self.nodes[id.index()];
        out.push_str(&"\t".repeat(level));
        out.push_str("[ . ");
        match node {
            Node::Leaf(leaf) => {
                for entry in &leaf.entries {
                    let _ = write!(out, "{:?} . ", entry.key);
                }
                out.push_str("]\n");
            }
            Node::Internal(internal) => {
                for key in &internal.keys {
                    let _ = write!(out, "{key:?} . ");
                }
                out.push_str("]\n");
                for &child in &internal.children {
                    self.dump_node(child, level + 1, out);
                }
            }
        }
    }

    /// Descend from `node_id` and insert, splitting on the way back up.
    fn insert(
        &mut self,
        node_id: NodeId,
        key: K,
        value: V,
    ) -> Result<InsertOutcome<K>, DuplicateKey<K>> {
        let order = self.order;
        let sibling_id = NodeId(self.nodes.len());

        let (at, child) = match &mut self.nodes[node_id.index()] {
            Node::Leaf(leaf) => {
                if !leaf.is_full(order) {
                    leaf.wedge(key, value)?;
                    return Ok(InsertOutcome::NoSplit);
                }
                let (divider, right) = leaf.split_insert(key, value, order, sibling_id)?;
                tracing::trace!(leaf = %node_id, sibling = %sibling_id, "split leaf");
                self.nodes.push(Node::Leaf(right));
                return Ok(InsertOutcome::Split {
                    divider,
                    sibling: sibling_id,
                });
            }
            Node::Internal(node) => {
                let at = node.find_child_index(&key);
                (at, node.children[at])
            }
        };

        match self.insert(child, key, value)? {
            InsertOutcome::NoSplit => Ok(InsertOutcome::NoSplit),
            InsertOutcome::Split { divider, sibling } => {
                Ok(self.absorb_split(node_id, at, divider, sibling))
            }
        }
    }

    /// Record a child split in internal node `node_id`, splitting it in turn
    /// when it is already full.
    fn absorb_split(
        &mut self,
        node_id: NodeId,
        at: usize,
        divider: K,
        sibling: NodeId,
    ) -> InsertOutcome<K> {
        let order = self.order;
        let Node::Internal(node) = &mut self.nodes[node_id.index()] else {
            unreachable!("only internal nodes have children that split");
        };

        if !node.is_full(order) {
            node.wedge(at, divider, sibling);
            return InsertOutcome::NoSplit;
        }

        let (promoted, right) = node.split_insert(at, divider, sibling, order);
        let right_id = NodeId(self.nodes.len());
        tracing::trace!(node = %node_id, sibling = %right_id, "split internal node");
        self.nodes.push(Node::Internal(right));

        InsertOutcome::Split {
            divider: promoted,
            sibling: right_id,
        }
    }

    /// Replace the root with a new node above the old root and its sibling.
    fn grow_root(&mut self, divider: K, sibling: NodeId) {
        let old_root = self.root;
        let new_root = NodeId(self.nodes.len());
        self.nodes.push(Node::Internal(InternalNode::with_children(
            old_root, divider, sibling,
        )));
        self.root = new_root;
        tracing::debug!(root = %new_root, height = self.height(), "grew new root");
    }

    /// Find the leaf that covers `key`.
    fn find_leaf(&self, key: &K) -> &LeafNode<K, V> {
        let mut current = self.root;
        loop {
            match &self.nodes[current.index()] {
                Node::Leaf(leaf) => return leaf,
                Node::Internal(node) => current = node.children[node.find_child_index(key)],
            }
        }
    }

    /// Position an iterator at the first key `>= from`.
    fn seek(&self, from: &K, end: Bound<K>) -> Iter<'_, K, V> {
        let leaf = self.find_leaf(from);
        let index = leaf.find_index(from).unwrap_or_else(|i| i);
        Iter::new(&self.nodes, Some(leaf), index, end)
    }

    pub(crate) fn first_leaf(&self) -> Option<&LeafNode<K, V>> {
        self.nodes[NodeId::FIRST_LEAF.index()].as_leaf()
    }

    /// Walk the leaf chain from the first leaf.
    pub(crate) fn leaves(&self) -> impl Iterator<Item = &LeafNode<K, V>> {
        std::iter::successors(self.first_leaf(), |leaf| {
            leaf.next_leaf
                .and_then(|id| self.nodes[id.index()].as_leaf())
        })
    }
}

impl<'a, K: Ord + Clone, V> IntoIterator for &'a BPlusTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord + Clone + Debug, V> KeyIndex<K, V> for BPlusTreeMap<K, V> {
    fn get(&self, key: &K) -> Option<&V> {
        Self::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Result<(), DuplicateKey<K>> {
        Self::put(self, key, value)
    }

    fn size(&self) -> usize {
        self.len
    }

    fn entries(&self) -> Entries<'_, K, V> {
        Box::new(self.iter())
    }

    fn as_ordered(&self) -> Option<&dyn OrderedIndex<K, V>> {
        Some(self)
    }
}

impl<K: Ord + Clone + Debug, V> OrderedIndex<K, V> for BPlusTreeMap<K, V> {
    fn first_key(&self) -> Option<&K> {
        Self::first_key(self)
    }

    fn last_key(&self) -> Option<&K> {
        Self::last_key(self)
    }

    fn range<'a>(&'a self, from: &K, to: &K) -> Entries<'a, K, V> {
        Box::new(Self::range(self, from, to))
    }
}

impl<K, V> Debug for BPlusTreeMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BPlusTreeMap")
            .field("order", &self.order)
            .field("len", &self.len)
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}
