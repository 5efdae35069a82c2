//! In-memory linear hashing index.
//!
//! An unordered map that grows one bucket at a time. Each home bucket holds a
//! fixed number of slots and chains overflow buckets when those run out.
//!
//! # Usage
//!
//! ```
//! use keyindex::linhash::LinearHashMap;
//!
//! let mut table = LinearHashMap::new();
//! for k in 0..100u32 {
//!     table.put(k, k * k);
//! }
//!
//! assert_eq!(table.get(&7), Some(&49));
//! assert_eq!(table.get(&999), None);
//! assert!(table.bucket_count() > 8);
//! ```

mod bucket;
mod invariants;
mod table;

pub use table::{DefaultHashBuilder, Iter, LinearHashMap};
