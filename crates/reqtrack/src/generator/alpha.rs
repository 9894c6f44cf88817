use crate::{IdGenerator, RandSource, RequestId};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// The 52 characters identifiers are drawn from: `A-Z` then `a-z`.
pub const ALPHABET: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Default identifier length.
///
/// 52^10 is about 1.4e17 identifiers. By the birthday bound a registry holding
/// a billion entries sees a collision with probability around 3.5e-3, which
/// the registry absorbs by regenerating.
pub const DEFAULT_ID_LEN: usize = 10;

const RADIX: u64 = ALPHABET.len() as u64;

/// Largest raw sample accepted by rejection sampling. Samples above it fall
/// in the partial bucket at the top of the `u64` range and would bias the
/// low letters.
const ACCEPT_MAX: u64 = u64::MAX - ((u64::MAX % RADIX) + 1) % RADIX;

/// A fixed-length random identifier generator over [`ALPHABET`].
///
/// Every character is drawn independently and uniformly from the alphabet
/// using the injected [`RandSource`]. A length of zero yields the empty
/// identifier.
///
/// # Example
/// ```
/// use reqtrack::{AlphaIdGenerator, IdGenerator, SeededRandom};
///
/// let generator = AlphaIdGenerator::new(12, SeededRandom::new(42));
/// let id = generator.next_id();
/// assert_eq!(id.len(), 12);
/// assert!(id.as_str().bytes().all(|b| b.is_ascii_alphabetic()));
/// ```
#[derive(Debug, Clone)]
pub struct AlphaIdGenerator<R>
where
    R: RandSource<u64>,
{
    len: usize,
    rng: R,
}

impl<R> AlphaIdGenerator<R>
where
    R: RandSource<u64>,
{
    /// Creates a generator producing identifiers of `len` characters.
    pub const fn new(len: usize, rng: R) -> Self {
        Self { len, rng }
    }

    /// Returns the configured identifier length.
    pub const fn id_len(&self) -> usize {
        self.len
    }

    /// Returns the random source.
    pub const fn rng(&self) -> &R {
        &self.rng
    }

    /// Draws one alphabet index.
    ///
    /// A source that only ever returns values above `ACCEPT_MAX` never
    /// terminates; real and seeded sources hit that range with probability
    /// 16 / 2^64 per draw.
    fn next_index(&self) -> usize {
        loop {
            let sample = self.rng.rand();
            if sample <= ACCEPT_MAX {
                return (sample % RADIX) as usize;
            }
        }
    }
}

impl<R> IdGenerator for AlphaIdGenerator<R>
where
    R: RandSource<u64>,
{
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn next_id(&self) -> RequestId {
        let id: String = (0..self.len)
            .map(|_| char::from(ALPHABET[self.next_index()]))
            .collect();
        RequestId::from(id)
    }
}

#[cfg(feature = "std")]
impl Default for AlphaIdGenerator<crate::ThreadRandom> {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LEN, crate::ThreadRandom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct StepRand {
        values: Vec<u64>,
        index: Cell<usize>,
    }

    impl StepRand {
        fn new(values: Vec<u64>) -> Self {
            Self {
                values,
                index: Cell::new(0),
            }
        }
    }

    impl RandSource<u64> for StepRand {
        fn rand(&self) -> u64 {
            let i = self.index.get();
            self.index.set(i + 1);
            self.values[i % self.values.len()]
        }
    }

    #[test]
    fn alphabet_is_52_distinct_letters() {
        let mut sorted = ALPHABET.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 52);
        assert!(ALPHABET.iter().all(u8::is_ascii_alphabetic));
    }

    #[test]
    fn accept_max_is_last_full_bucket() {
        // 2^64 mod 52 == 16
        assert_eq!(ACCEPT_MAX, u64::MAX - 16);
        assert_eq!((ACCEPT_MAX % RADIX) as usize, ALPHABET.len() - 1);
    }

    #[test]
    fn maps_samples_onto_alphabet() {
        let generator = AlphaIdGenerator::new(4, StepRand::new(vec![0, 25, 26, 51]));
        assert_eq!(generator.next_id(), "AZaz");
    }

    #[test]
    fn wraps_samples_modulo_radix() {
        let generator = AlphaIdGenerator::new(2, StepRand::new(vec![52, 52 * 3 + 1]));
        assert_eq!(generator.next_id(), "AB");
    }

    #[test]
    fn rejects_biased_samples() {
        let generator = AlphaIdGenerator::new(1, StepRand::new(vec![u64::MAX, ACCEPT_MAX + 1, 2]));
        assert_eq!(generator.next_id(), "C");
    }

    #[test]
    fn zero_length_is_empty() {
        let generator = AlphaIdGenerator::new(0, StepRand::new(vec![7]));
        let id = generator.next_id();
        assert!(id.is_empty());
        assert_eq!(generator.rng().index.get(), 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn default_generator_has_default_length() {
        let generator = AlphaIdGenerator::default();
        for _ in 0..64 {
            let id = generator.next_id();
            assert_eq!(id.len(), DEFAULT_ID_LEN);
            assert!(id.as_str().bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn seeded_generators_repeat() {
        let a = AlphaIdGenerator::new(DEFAULT_ID_LEN, crate::SeededRandom::new(99));
        let b = AlphaIdGenerator::new(DEFAULT_ID_LEN, crate::SeededRandom::new(99));
        for _ in 0..32 {
            assert_eq!(a.next_id(), b.next_id());
        }
    }
}
