use crate::RandSource;
use rand::{Rng, rng};

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is fast, cryptographically secure (ChaCha-based), and automatically
/// reseeded periodically.
///
/// Each OS thread has its own RNG instance, so calls from multiple threads are
/// contention-free and safe. This type does **not** store the RNG itself; it
/// simply accesses the thread-local generator on each call, which is why it
/// is `Send + Sync` even though the underlying `ThreadRng` is not.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u64> for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}
