use crate::RandSource;
use crate::lock::{Mutex, lock_recover};
use core::fmt;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// A deterministic `RandSource` backed by a seeded [`StdRng`].
///
/// Two sources built from the same seed yield the same sequence, which makes
/// identifier generation reproducible in tests and replays. The RNG sits
/// behind a mutex so the source can be shared by every thread using a
/// [`Registry`].
///
/// The sequence is only reproducible across builds of the same `rand`
/// version; do not persist it.
///
/// [`Registry`]: crate::Registry
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Creates a source seeded from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl fmt::Debug for SeededRandom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededRandom").finish_non_exhaustive()
    }
}

impl RandSource<u64> for SeededRandom {
    fn rand(&self) -> u64 {
        lock_recover(&self.rng).random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let a = SeededRandom::new(7);
        let b = SeededRandom::new(7);
        let xs: Vec<u64> = (0..16).map(|_| a.rand()).collect();
        let ys: Vec<u64> = (0..16).map(|_| b.rand()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = SeededRandom::new(1);
        let b = SeededRandom::new(2);
        let xs: Vec<u64> = (0..16).map(|_| a.rand()).collect();
        let ys: Vec<u64> = (0..16).map(|_| b.rand()).collect();
        assert_ne!(xs, ys);
    }
}
