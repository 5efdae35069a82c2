//! Primary-key index engines for an in-memory table store.
//!
//! Two interchangeable engines implement the same map contract:
//! - [`btree::BPlusTreeMap`]: ordered, leaf-linked, grows by node splits
//! - [`linhash::LinearHashMap`]: unordered, grows one bucket split at a time
//!
//! A table picks one engine (or none) through [`config::IndexConfig`] and
//! holds it as a [`primary::PrimaryIndex`].
//!
//! Life of a put:
//! 1. The table hands `(key, row)` to its `PrimaryIndex`
//! 2. The engine places the entry, splitting nodes or buckets as needed
//! 3. The B+Tree rejects a key it already holds; linear hashing stores it again
//!
//! Neither engine supports removal or concurrent mutation.
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod btree;
pub mod config;
pub mod invariants;
pub mod linhash;
pub mod map;
pub mod primary;

#[cfg(test)]
mod testing;

pub use btree::BPlusTreeMap;
pub use config::{ConfigError, IndexConfig, IndexKind};
pub use invariants::InvariantViolation;
pub use linhash::LinearHashMap;
pub use map::{DuplicateKey, Entries, KeyIndex, OrderedIndex};
pub use primary::PrimaryIndex;
