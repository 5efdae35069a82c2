//! Structural checks for the B+Tree.

use std::fmt::Debug;

use crate::btree::node::{Node, NodeId, split_point};
use crate::btree::tree::BPlusTreeMap;
use crate::invariants::InvariantViolation;

/// State gathered during one pre-order walk.
struct Walk {
    leaf_depth: Option<usize>,
    leaves: Vec<NodeId>,
    entries: usize,
}

impl<K: Ord + Clone + Debug, V> BPlusTreeMap<K, V> {
    /// Verify every structural invariant of the tree.
    ///
    /// Checks that keys are strictly increasing within each node, that every key
    /// lies within the bounds set by its ancestors' dividers, that each divider
    /// is the largest key of its left subtree, that all leaves share one depth,
    /// that non-root nodes hold between `ceil(order / 2) - 1` and `order - 1`
    /// keys, that the leaf chain visits exactly the in-order leaves starting
    /// from the first leaf, and that the key count matches.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut walk = Walk {
            leaf_depth: None,
            leaves: Vec::new(),
            entries: 0,
        };
        self.check_node(self.root, 0, None, None, &mut walk)?;

        if walk.leaves.first() != Some(&NodeId::FIRST_LEAF) {
            return Err(InvariantViolation::new(
                "first leaf is not the leftmost leaf",
                format!("leftmost: {:?}", walk.leaves.first()),
            ));
        }

        let chain = self.leaf_chain()?;
        if chain != walk.leaves {
            return Err(InvariantViolation::new(
                "leaf chain does not match in-order leaves",
                format!("chain: {chain:?}, tree: {:?}", walk.leaves),
            ));
        }

        if walk.entries != self.len {
            return Err(InvariantViolation::new(
                "key count mismatch",
                format!("counted {}, recorded {}", walk.entries, self.len),
            ));
        }

        Ok(())
    }

    /// Check the subtree at `id`, whose keys must lie in `(lower, upper]`.
    ///
    /// Returns the largest key in the subtree.
    fn check_node<'a>(
        &'a self,
        id: NodeId,
        depth: usize,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        walk: &mut Walk,
    ) -> Result<Option<&'a K>, InvariantViolation> {
        let node = self
            .nodes
            .get(id.index())
            .ok_or_else(|| InvariantViolation::new("dangling node id", id.to_string()))?;

        self.check_occupancy(id, node)?;

        match node {
            Node::Leaf(leaf) => {
                let keys: Vec<&K> = leaf.entries.iter().map(|e| &e.key).collect();
                check_keys(id, &keys, lower, upper)?;

                match walk.leaf_depth {
                    None => walk.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(InvariantViolation::new(
                            "leaves at unequal depth",
                            format!("leaf {id} at depth {depth}, expected {expected}"),
                        ));
                    }
                    Some(_) => {}
                }

                walk.leaves.push(id);
                walk.entries += leaf.entries.len();
                Ok(leaf.last_key())
            }
            Node::Internal(internal) => {
                let keys: Vec<&K> = internal.keys.iter().collect();
                check_keys(id, &keys, lower, upper)?;

                if internal.children.len() != internal.keys.len() + 1 {
                    return Err(InvariantViolation::new(
                        "child count must be key count + 1",
                        format!(
                            "node {id}: {} keys, {} children",
                            internal.keys.len(),
                            internal.children.len()
                        ),
                    ));
                }

                let mut max = None;
                for (i, &child) in internal.children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(&internal.keys[i - 1]) };
                    let child_upper = internal.keys.get(i).or(upper);
                    max = self.check_node(child, depth + 1, child_lower, child_upper, walk)?;

                    if let Some(divider) = internal.keys.get(i) {
                        if max != Some(divider) {
                            return Err(InvariantViolation::new(
                                "divider is not the largest key of its left subtree",
                                format!("node {id} divider {divider:?}, subtree max {max:?}"),
                            ));
                        }
                    }
                }
                Ok(max)
            }
        }
    }

    fn check_occupancy(&self, id: NodeId, node: &Node<K, V>) -> Result<(), InvariantViolation> {
        let keys = node.key_count();
        let max = self.order - 1;
        let min = if id == self.root {
            usize::from(matches!(node, Node::Internal(_)))
        } else {
            split_point(self.order) - 1
        };

        if keys < min || keys > max {
            return Err(InvariantViolation::new(
                "node occupancy out of bounds",
                format!("node {id}: {keys} keys, allowed {min}..={max}"),
            ));
        }
        Ok(())
    }

    /// Follow forward links from the first leaf, refusing cycles.
    fn leaf_chain(&self) -> Result<Vec<NodeId>, InvariantViolation> {
        let mut chain = Vec::new();
        let mut current = Some(NodeId::FIRST_LEAF);

        while let Some(id) = current {
            if chain.len() > self.nodes.len() {
                return Err(InvariantViolation::new("leaf chain has a cycle", id.to_string()));
            }
            let leaf = self
                .nodes
                .get(id.index())
                .and_then(Node::as_leaf)
                .ok_or_else(|| {
                    InvariantViolation::new("leaf chain points at a non-leaf", id.to_string())
                })?;
            chain.push(id);
            current = leaf.next_leaf;
        }

        Ok(chain)
    }
}

/// Keys must be strictly increasing and lie in `(lower, upper]`.
fn check_keys<K: Ord + Debug>(
    id: NodeId,
    keys: &[&K],
    lower: Option<&K>,
    upper: Option<&K>,
) -> Result<(), InvariantViolation> {
    if let Some(pair) = keys.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(InvariantViolation::new(
            "keys not strictly increasing",
            format!("node {id}: {:?} before {:?}", pair[0], pair[1]),
        ));
    }

    for &key in keys {
        let above_lower = lower.is_none_or(|lower| key > lower);
        let within_upper = upper.is_none_or(|upper| key <= upper);
        if !above_lower || !within_upper {
            return Err(InvariantViolation::new(
                "key outside divider bounds",
                format!("node {id}: {key:?} not in ({lower:?}, {upper:?}]"),
            ));
        }
    }

    Ok(())
}
