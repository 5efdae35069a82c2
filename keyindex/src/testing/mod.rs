//! Helpers shared by unit and end-to-end tests.

use std::hash::{BuildHasherDefault, Hasher};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Install a tracing subscriber that writes through the test harness.
///
/// Filtered by `RUST_LOG`, defaulting to `keyindex=debug`. Safe to call from
/// every test; only the first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keyindex=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Deterministic RNG so failing randomized runs can be replayed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Hasher that returns integer keys unchanged.
///
/// Makes linear hash placement predictable: key `k` lives in bucket
/// `k mod mod1` (or `k mod mod2` once that bucket has split).
#[derive(Debug, Default)]
pub struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = (self.0 << 8) | u64::from(byte);
        }
    }

    fn write_u32(&mut self, n: u32) {
        self.0 = u64::from(n);
    }

    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
}

pub type IdentityHashBuilder = BuildHasherDefault<IdentityHasher>;
