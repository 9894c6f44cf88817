use core::fmt;

/// A result type whose error defaults to [`Error`].
///
/// Registry operations only fail under abnormal conditions: a poisoned lock
/// (std backend only) or an exhausted identifier space.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `reqtrack` can emit.
///
/// An unknown identifier is never an error. [`Registry::query`] answers
/// [`RequestState::Unknown`] and [`Registry::complete`] is a silent no-op.
///
/// [`Registry::query`]: crate::Registry::query
/// [`Registry::complete`]: crate::Registry::complete
/// [`RequestState::Unknown`]: crate::RequestState::Unknown
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Error {
    /// The operation failed because the registry lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, locks do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    LockPoisoned,

    /// Every generated identifier collided with a live entry.
    ///
    /// The registry regenerates an identifier while it is already taken, up
    /// to [`RegistryConfig::max_id_attempts`] times. With the default length
    /// of 10 letters this is practically unreachable; it surfaces when the
    /// identifier space is tiny (e.g. `id_len` of 0 or 1).
    ///
    /// [`RegistryConfig::max_id_attempts`]: crate::RegistryConfig::max_id_attempts
    IdSpaceExhausted {
        /// Number of identifiers generated before giving up.
        attempts: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl core::error::Error for Error {}

#[cfg(not(feature = "parking-lot"))]
use std::sync::PoisonError;
// Convert all poisoned lock errors to a simplified `LockPoisoned`
#[cfg(not(feature = "parking-lot"))]
impl<G> From<PoisonError<G>> for Error {
    fn from(_: PoisonError<G>) -> Self {
        Self::LockPoisoned
    }
}
