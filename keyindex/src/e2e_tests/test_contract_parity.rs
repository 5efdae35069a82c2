//! The same workload driven through the map contract on every engine.

use std::collections::BTreeMap;

use crate::btree::BPlusTreeMap;
use crate::config::{IndexConfig, IndexKind};
use crate::linhash::LinearHashMap;
use crate::map::KeyIndex;
use crate::primary::PrimaryIndex;

fn engines() -> Vec<(&'static str, Box<dyn KeyIndex<i64, String>>)> {
    let btreemap: Box<dyn KeyIndex<i64, String>> = Box::new(BTreeMap::new());
    let bptree: Box<dyn KeyIndex<i64, String>> = Box::new(BPlusTreeMap::new());
    let linhash: Box<dyn KeyIndex<i64, String>> = Box::new(LinearHashMap::new());
    vec![("btreemap", btreemap), ("bptree", bptree), ("linhash", linhash)]
}

fn keys() -> impl Iterator<Item = i64> {
    // Interleaved negatives and positives
    (0..200).map(|i| if i % 2 == 0 { i * 7 } else { -i * 3 })
}

#[test]
fn test_point_lookups_agree() {
    for (name, mut engine) in engines() {
        for k in keys() {
            engine.put(k, format!("v{k}")).expect("unique key");
        }

        for k in keys() {
            assert_eq!(
                engine.get(&k).map(String::as_str),
                Some(format!("v{k}").as_str()),
                "{name}: key {k}"
            );
        }
        assert_eq!(engine.get(&1), None, "{name}");
        assert_eq!(engine.entries().count(), 200, "{name}");
    }
}

#[test]
fn test_ordered_engines_agree_on_ranges() {
    let mut reference = BTreeMap::new();
    let mut tree = BPlusTreeMap::new();
    for k in keys() {
        KeyIndex::put(&mut reference, k, k).expect("unique key");
        tree.put(k, k).expect("unique key");
    }

    let reference: &dyn KeyIndex<i64, i64> = &reference;
    let tree: &dyn KeyIndex<i64, i64> = &tree;
    let reference = reference.as_ordered().expect("ordered");
    let tree = tree.as_ordered().expect("ordered");

    assert_eq!(reference.first_key(), tree.first_key());
    assert_eq!(reference.last_key(), tree.last_key());
    for (from, to) in [(-600, 600), (-10, 10), (0, 1), (100, 50), (1000, 2000)] {
        let expected: Vec<_> = reference.range(&from, &to).collect();
        let actual: Vec<_> = tree.range(&from, &to).collect();
        assert_eq!(actual, expected, "range [{from}, {to})");
    }
    assert!(
        tree.entries()
            .zip(tree.entries().skip(1))
            .all(|((a, _), (b, _))| a < b)
    );
}

#[test]
fn test_table_built_from_environment_style_config() {
    let config = IndexConfig::from_lookup(|name| match name {
        "KEYINDEX_KIND" => Some("bptree".to_string()),
        "KEYINDEX_BPTREE_ORDER" => Some("4".to_string()),
        _ => None,
    })
    .expect("valid config");

    let mut index: PrimaryIndex<i64, i64> = PrimaryIndex::from_config(&config).expect("valid");
    assert_eq!(index.kind(), IndexKind::BPlusTree);

    for k in keys() {
        index.insert(k, k * 2).expect("unique key");
    }
    assert_eq!(index.lookup(&14), Some(&28));
    let window = index.range(&-9, &0).expect("ordered");
    assert_eq!(window, vec![(&-9, &-18), (&-3, &-6)]);

    let PrimaryIndex::BPlusTree(tree) = &index else {
        panic!("configured for a b+tree");
    };
    assert_eq!(tree.order(), 4);
    tree.check_invariants().expect("invariants hold");
}
