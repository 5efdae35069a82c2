//! In-memory B+Tree index.
//!
//! # Structure
//!
//! The tree consists of:
//! - Internal nodes: store dividers and child node ids
//! - Leaf nodes: store key-value pairs, singly linked for range scans
//!
//! Every divider equals the largest key of the subtree to its left, so a key
//! `k` descends into the first child whose divider is `>= k`.
//!
//! # Usage
//!
//! ```
//! use keyindex::btree::BPlusTreeMap;
//!
//! let mut tree = BPlusTreeMap::new();
//! for k in [5, 1, 9, 3, 7] {
//!     tree.put(k, k * 10).unwrap();
//! }
//!
//! assert_eq!(tree.get(&3), Some(&30));
//! assert_eq!(tree.first_key(), Some(&1));
//! assert!(tree.put(5, 0).is_err());
//!
//! let keys: Vec<i32> = tree.range(&3, &8).map(|(k, _)| *k).collect();
//! assert_eq!(keys, vec![3, 5, 7]);
//! ```

mod invariants;
mod iter;
mod node;
mod tree;

pub use iter::Iter;
pub use node::NodeId;
pub use tree::BPlusTreeMap;
