//! Structural checks for the linear hash table.

use std::hash::{BuildHasher, Hash};

use crate::invariants::InvariantViolation;
use crate::linhash::table::LinearHashMap;

impl<K: Hash + Eq + std::fmt::Debug, V, S: BuildHasher> LinearHashMap<K, V, S> {
    /// Verify every structural invariant of the table.
    ///
    /// Checks the split state (`mod1` is a power of two, `split < mod1`, the
    /// table holds `mod1 + split` buckets), that every stored key sits in the
    /// chain of its home bucket, that every link but the last in a chain is
    /// full, and that the entry count matches.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if !self.mod1.is_power_of_two() {
            return Err(InvariantViolation::new(
                "mod1 is not a power of two",
                format!("mod1 = {}", self.mod1),
            ));
        }

        if self.split >= self.mod1 {
            return Err(InvariantViolation::new(
                "split pointer out of range",
                format!("split = {}, mod1 = {}", self.split, self.mod1),
            ));
        }

        if self.table.len() != self.mod1 + self.split {
            return Err(InvariantViolation::new(
                "bucket count must be mod1 + split",
                format!(
                    "{} buckets, mod1 = {}, split = {}",
                    self.table.len(),
                    self.mod1,
                    self.split
                ),
            ));
        }

        let mut entries = 0;
        for (index, bucket) in self.table.iter().enumerate() {
            let links: Vec<_> = bucket.chain().collect();
            for (depth, link) in links.iter().enumerate() {
                let is_tail = depth + 1 == links.len();
                let full = link.entries.len() == self.slots;
                if link.entries.len() > self.slots || (!is_tail && !full) {
                    return Err(InvariantViolation::new(
                        "bucket link has wrong occupancy",
                        format!(
                            "bucket {index} link {depth}: {} of {} slots",
                            link.entries.len(),
                            self.slots
                        ),
                    ));
                }
                if depth > 0 && link.entries.is_empty() {
                    return Err(InvariantViolation::new(
                        "empty overflow bucket",
                        format!("bucket {index} link {depth}"),
                    ));
                }

                for (key, _) in &link.entries {
                    let home = self.home_of(self.hash(key));
                    if home != index {
                        return Err(InvariantViolation::new(
                            "key stored outside its home bucket",
                            format!("{key:?} in bucket {index}, home is {home}"),
                        ));
                    }
                }
                entries += link.entries.len();
            }
        }

        if entries != self.len {
            return Err(InvariantViolation::new(
                "entry count mismatch",
                format!("counted {entries}, recorded {}", self.len),
            ));
        }

        Ok(())
    }
}
