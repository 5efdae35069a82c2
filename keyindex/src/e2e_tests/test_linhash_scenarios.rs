//! Linear hash scenarios: incremental growth, overflow chains and lookups
//! across generations.

use crate::linhash::LinearHashMap;
use crate::map::KeyIndex;
use crate::testing::{IdentityHashBuilder, init_tracing};

#[test]
fn test_sequential_inserts_trigger_split() {
    init_tracing();
    let mut table = LinearHashMap::with_layout(10, 8).expect("valid layout");

    for k in 0..=79u32 {
        table.put(k, k * k);
    }

    // The 80th entry brings the load factor to 1.0
    assert!(table.bucket_count() > 8);
    assert_eq!(table.split_pointer(), 1);
    for k in 0..=79u32 {
        assert_eq!(table.get(&k), Some(&(k * k)), "lost key {k}");
    }
    assert_eq!(table.get(&999), None);
    table.check_invariants().expect("invariants hold");
}

#[test]
fn test_every_key_found_from_home_bucket() {
    let mut table = LinearHashMap::new();

    for k in 1..=3000u32 {
        table.put(k, k * k);
        if k % 250 == 0 {
            table.check_invariants().expect("invariants hold");
        }
    }

    assert_eq!(table.len(), 3000);
    assert_eq!(table.entries().count(), 3000);
    for k in 1..=3000u32 {
        assert_eq!(table.get(&k), Some(&(k * k)));
    }
    assert_eq!(table.get(&0), None);
    assert_eq!(table.get(&3001), None);
}

#[test]
fn test_split_pointer_cycles_through_generation() {
    let mut table: LinearHashMap<u32, ()> = LinearHashMap::with_layout(4, 4).expect("valid layout");
    let mut seen_splits = Vec::new();

    let mut k = 0;
    while table.modulus() == 4 {
        let before = table.split_pointer();
        table.put(k, ());
        if table.split_pointer() != before {
            seen_splits.push(before);
        }
        k += 1;
    }

    // Pointer visited every bucket of the first generation in order
    assert_eq!(seen_splits, vec![0, 1, 2, 3]);
    assert_eq!(table.modulus(), 8);
    assert_eq!(table.split_pointer(), 0);
    assert_eq!(table.bucket_count(), 8);
    table.check_invariants().expect("invariants hold");
}

#[test]
fn test_skewed_keys_build_overflow_chains() {
    // All keys are multiples of 64, so with identity hashing they share one
    // home bucket until the table has more than 64 buckets
    let mut table =
        LinearHashMap::with_layout_and_hasher(2, 4, IdentityHashBuilder::default())
            .expect("valid layout");

    for i in 0..40u64 {
        table.put(i * 64, i);
    }

    assert!(table.chain_length(0).expect("bucket 0 exists") > 1);
    for i in 0..40u64 {
        assert_eq!(table.get(&(i * 64)), Some(&i));
    }
    table.check_invariants().expect("invariants hold");
}

#[test]
fn test_size_is_capacity_not_count() {
    let mut table = LinearHashMap::new();
    table.put("a", 1);
    table.put("b", 2);

    assert_eq!(table.len(), 2);
    assert_eq!(KeyIndex::size(&table), 80);
}
