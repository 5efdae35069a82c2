//! Ordered iteration along the leaf chain.

use std::iter::FusedIterator;
use std::ops::Bound;

use crate::btree::node::{LeafNode, Node};

/// Iterator over B+Tree entries in ascending key order.
///
/// Starts at a position inside some leaf and follows forward links until the
/// chain ends or a key reaches the upper bound.
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    leaf: Option<&'a LeafNode<K, V>>,
    index: usize,
    end: Bound<K>,
}

impl<'a, K: Ord, V> Iter<'a, K, V> {
    pub(crate) const fn new(
        nodes: &'a [Node<K, V>],
        leaf: Option<&'a LeafNode<K, V>>,
        index: usize,
        end: Bound<K>,
    ) -> Self {
        Self {
            nodes,
            leaf,
            index,
            end,
        }
    }

    pub(crate) const fn empty(nodes: &'a [Node<K, V>]) -> Self {
        Self::new(nodes, None, 0, Bound::Unbounded)
    }

    fn below_end(&self, key: &K) -> bool {
        match &self.end {
            Bound::Included(end) => key <= end,
            Bound::Excluded(end) => key < end,
            Bound::Unbounded => true,
        }
    }
}

impl<'a, K: Ord, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.leaf?;

            if let Some(entry) = leaf.entries.get(self.index) {
                if !self.below_end(&entry.key) {
                    self.leaf = None;
                    return None;
                }
                self.index += 1;
                return Some((&entry.key, &entry.value));
            }

            // Move to next leaf
            self.leaf = leaf
                .next_leaf
                .and_then(|id| self.nodes[id.index()].as_leaf());
            self.index = 0;
        }
    }
}

impl<K: Ord, V> FusedIterator for Iter<'_, K, V> {}
