//! Seeded random workloads checked against `BTreeMap` after every operation.
//!
//! A failing seed reproduces the exact operation sequence.

use std::collections::BTreeMap;

use rand::Rng;
use rand::rngs::StdRng;

use crate::btree::BPlusTreeMap;
use crate::linhash::LinearHashMap;
use crate::testing::seeded_rng;

const SEEDS: [u64; 4] = [1, 42, 12_345, 0xDEAD_BEEF];

/// Random key drawn from a range small enough to produce duplicates.
fn next_key(rng: &mut StdRng, key_space: u32) -> u32 {
    rng.random_range(0..key_space)
}

fn run_bptree(seed: u64, order: usize, operations: usize) {
    let mut rng = seeded_rng(seed);
    let mut tree = BPlusTreeMap::with_order(order).expect("valid order");
    let mut reference = BTreeMap::new();

    for step in 0..operations {
        let key = next_key(&mut rng, 400);
        let value: u64 = rng.random();

        let accepted = tree.put(key, value).is_ok();
        let expected = !reference.contains_key(&key);
        assert_eq!(accepted, expected, "seed {seed} step {step}: put {key}");
        reference.entry(key).or_insert(value);

        if let Err(violation) = tree.check_invariants() {
            panic!("seed {seed} step {step}: {violation}\n{}", tree.dump());
        }

        // Spot-check a random lookup and a random window
        let probe = next_key(&mut rng, 450);
        assert_eq!(tree.get(&probe), reference.get(&probe), "seed {seed} step {step}");

        let from = next_key(&mut rng, 400);
        let to = from + next_key(&mut rng, 60);
        let actual: Vec<_> = tree.range(&from, &to).collect();
        let expected: Vec<_> = reference.range(from..to).collect();
        assert_eq!(actual, expected, "seed {seed} step {step}: range [{from}, {to})");
    }

    let all: Vec<_> = tree.iter().collect();
    let expected: Vec<_> = reference.iter().collect();
    assert_eq!(all, expected, "seed {seed}: full scan");
    assert_eq!(tree.first_key(), reference.keys().next());
    assert_eq!(tree.last_key(), reference.keys().next_back());
}

#[test]
fn test_random_bptree_default_order() {
    for seed in SEEDS {
        run_bptree(seed, 5, 600);
    }
}

#[test]
fn test_random_bptree_minimum_order() {
    for seed in SEEDS {
        run_bptree(seed, 3, 600);
    }
}

#[test]
fn test_random_bptree_wide_order() {
    for seed in SEEDS {
        run_bptree(seed, 16, 600);
    }
}

#[test]
fn test_random_linhash() {
    for seed in SEEDS {
        let mut rng = seeded_rng(seed);
        let mut table = LinearHashMap::with_layout(3, 2).expect("valid layout");
        // First value per key, which is what lookups return
        let mut reference = BTreeMap::new();
        let mut puts = 0;

        for step in 0..1500 {
            let key = next_key(&mut rng, 1000);
            let value: u32 = rng.random();
            table.put(key, value);
            reference.entry(key).or_insert(value);
            puts += 1;

            if let Err(violation) = table.check_invariants() {
                panic!("seed {seed} step {step}: {violation}\n{}", table.dump());
            }
            assert_eq!(table.len(), puts);
            assert!(table.bucket_count() * table.slots() >= table.len() / 2);
        }

        for (key, value) in &reference {
            assert_eq!(table.get(key), Some(value), "seed {seed}: key {key}");
        }
        assert_eq!(table.get(&1000), None);
    }
}

#[test]
fn test_same_seed_same_shape() {
    let build = |seed| {
        let mut rng = seeded_rng(seed);
        let mut tree = BPlusTreeMap::new();
        for _ in 0..300 {
            let _ = tree.put(next_key(&mut rng, 10_000), ());
        }
        tree.dump()
    };

    assert_eq!(build(7), build(7));
}
