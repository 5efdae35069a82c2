//! B+Tree scenarios: point lookups, ordered scans and duplicate rejection.

use crate::btree::BPlusTreeMap;
use crate::map::{KeyIndex, OrderedIndex};
use crate::testing::init_tracing;

const ODD_KEYS: [u32; 7] = [1, 3, 5, 7, 9, 11, 13];

fn odd_squares() -> BPlusTreeMap<u32, u32> {
    let mut tree = BPlusTreeMap::new();
    for k in ODD_KEYS {
        tree.put(k, k * k).expect("unique key");
    }
    tree.check_invariants().expect("invariants hold");
    tree
}

#[test]
fn test_point_lookups_after_split() {
    init_tracing();
    let tree = odd_squares();

    assert_eq!(tree.get(&7), Some(&49));
    assert_eq!(tree.get(&2), None);
    assert_eq!(tree.first_key(), Some(&1));
    assert_eq!(tree.last_key(), Some(&13));
    assert_eq!(tree.size(), 7);

    // 7 keys do not fit in one leaf of 4
    assert!(tree.height() > 1);
    assert_eq!(
        tree.dump(),
        "BPlusTreeMap\n[ . 5 . ]\n\t[ . 1 . 3 . 5 . ]\n\t[ . 7 . 9 . 11 . 13 . ]\n"
    );
}

#[test]
fn test_entries_in_ascending_order() {
    let tree = odd_squares();

    let pairs: Vec<(u32, u32)> = tree.entries().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(
        pairs,
        vec![(1, 1), (3, 9), (5, 25), (7, 49), (9, 81), (11, 121), (13, 169)]
    );
}

#[test]
fn test_range_excludes_upper_bound() {
    let tree = odd_squares();

    let pairs: Vec<(u32, u32)> = OrderedIndex::range(&tree, &5, &11)
        .map(|(k, v)| (*k, *v))
        .collect();
    assert_eq!(pairs, vec![(5, 25), (7, 49), (9, 81)]);

    // Range spanning both leaves, bounds between keys
    let keys: Vec<u32> = tree.range(&4, &12).map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![5, 7, 9, 11]);
}

#[test]
fn test_duplicate_put_keeps_first_value() {
    let mut tree = BPlusTreeMap::new();

    tree.put(5, "a").expect("first put");
    let err = tree.put(5, "b").expect_err("second put is a duplicate");

    assert_eq!(err.key, 5);
    assert_eq!(err.to_string(), "duplicate key: 5");
    assert_eq!(tree.get(&5), Some(&"a"));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_duplicate_rejection_at_every_level() {
    let mut tree = BPlusTreeMap::with_order(3).expect("valid order");
    for k in 0..64u32 {
        tree.put(k, k).expect("unique key");
    }
    let height = tree.height();

    // Every key is now in a full or half-full leaf somewhere in a deep tree
    for k in 0..64u32 {
        assert!(tree.put(k, 1000).is_err(), "duplicate {k} accepted");
    }

    assert_eq!(tree.len(), 64);
    assert_eq!(tree.height(), height);
    for k in 0..64u32 {
        assert_eq!(tree.get(&k), Some(&k));
    }
    tree.check_invariants().expect("invariants hold");
}

#[test]
fn test_empty_tree_has_no_bounds() {
    let tree: BPlusTreeMap<u32, u32> = BPlusTreeMap::new();

    assert_eq!(tree.first_key(), None);
    assert_eq!(tree.last_key(), None);
    assert_eq!(tree.range(&0, &100).count(), 0);
    assert_eq!(tree.entries().count(), 0);
    tree.check_invariants().expect("invariants hold");
}

#[test]
fn test_deep_tree_small_order() {
    let mut tree = BPlusTreeMap::with_order(3).expect("valid order");
    for k in (0..1000u32).rev() {
        tree.put(k, k.to_string()).expect("unique key");
    }

    tree.check_invariants().expect("invariants hold");
    assert!(tree.height() >= 6);
    assert_eq!(tree.get(&500).map(String::as_str), Some("500"));
    assert_eq!(tree.range(&990, &2000).count(), 10);
    assert_eq!(tree.range_to(&10).count(), 10);
    assert_eq!(tree.range_from(&995).count(), 5);
    assert_eq!(tree.leaf_count(), tree.leaves().count());
}

#[test]
fn test_string_keys() {
    let mut tree = BPlusTreeMap::new();
    for word in ["pear", "apple", "fig", "kiwi", "banana", "cherry", "date"] {
        tree.put(word.to_string(), word.len()).expect("unique key");
    }

    assert_eq!(tree.first_key().map(String::as_str), Some("apple"));
    assert_eq!(tree.last_key().map(String::as_str), Some("pear"));
    let keys: Vec<&str> = tree
        .range(&"b".to_string(), &"e".to_string())
        .map(|(k, _)| k.as_str())
        .collect();
    assert_eq!(keys, vec!["banana", "cherry", "date"]);
    tree.check_invariants().expect("invariants hold");
}
