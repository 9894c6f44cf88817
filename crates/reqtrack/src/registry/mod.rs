mod config;

pub use config::*;

use crate::lock::{self, RwLock};
use crate::{
    AlphaIdGenerator, Error, IdGenerator, RandSource, Request, RequestId, RequestState, Result,
};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A thread-safe registry of submitted requests and their lifecycle state.
///
/// The registry maps identifiers to [`Request`]s behind a reader/writer lock:
///
/// - [`Self::submit`] and [`Self::complete`] take the lock exclusively, so
///   they are serialized with respect to each other and to queries.
/// - [`Self::query`] takes the lock shared, so any number of queries run
///   concurrently.
///
/// Share it across threads by reference (e.g. [`std::thread::scope`]) or
/// behind an [`Arc`](std::sync::Arc).
///
/// ## Guarantees
///
/// - A submitted request starts in [`RequestState::New`].
/// - Once a query observes [`RequestState::Finished`], every later query for
///   the same identifier observes it too.
/// - An identifier is never assigned to two live entries. A freshly generated
///   identifier that is already taken is regenerated, up to
///   [`RegistryConfig::max_id_attempts`] times.
/// - Unknown identifiers are not errors: queries answer
///   [`RequestState::Unknown`] and completions do nothing.
///
/// ## Not provided
///
/// Entries are never evicted implicitly; the map grows with every submission
/// until the caller invokes [`Self::remove`] or drops the registry. There is
/// no multi-operation transaction: "query, then complete if new" may
/// interleave with another caller's completion. No ordering between
/// submissions is promised.
///
/// # Example
/// ```
/// use reqtrack::{Registry, RequestState, SeededRandom};
///
/// let registry = Registry::with_rng(SeededRandom::new(7));
/// let id = registry.submit(42);
/// assert_eq!(registry.query(id.as_str()), RequestState::New);
///
/// registry.complete(id.as_str());
/// assert_eq!(registry.query(id.as_str()), RequestState::Finished);
/// assert_eq!(registry.query("doesnotexist"), RequestState::Unknown);
/// ```
pub struct Registry<P, R>
where
    R: RandSource<u64>,
{
    entries: RwLock<HashMap<RequestId, Request<P>>>,
    generator: AlphaIdGenerator<R>,
    max_id_attempts: usize,
}

/// A [`Registry`] drawing identifiers from the thread-local RNG.
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
pub type ThreadRegistry<P = i64> = Registry<P, crate::ThreadRandom>;

#[cfg(feature = "std")]
impl<P> Registry<P, crate::ThreadRandom> {
    /// Creates an empty registry with default settings, drawing identifiers
    /// from [`ThreadRandom`](crate::ThreadRandom).
    pub fn new() -> Self {
        Self::with_rng(crate::ThreadRandom)
    }
}

#[cfg(feature = "std")]
impl<P> Default for Registry<P, crate::ThreadRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> Registry<P, R>
where
    R: RandSource<u64>,
{
    /// Creates an empty registry with default settings and the given random
    /// source.
    pub fn with_rng(rng: R) -> Self {
        Self::with_config(RegistryConfig::default(), rng)
    }

    /// Creates an empty registry from explicit settings.
    ///
    /// The random source is owned by this registry alone, so tests can inject
    /// a deterministic source (e.g. [`SeededRandom`](crate::SeededRandom)).
    pub fn with_config(config: RegistryConfig, rng: R) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            generator: AlphaIdGenerator::new(config.id_len, rng),
            max_id_attempts: config.max_id_attempts.max(1),
        }
    }

    /// Returns the length of identifiers this registry generates.
    pub const fn id_len(&self) -> usize {
        self.generator.id_len()
    }

    /// Submits a payload and returns its newly assigned identifier.
    ///
    /// The request starts in [`RequestState::New`].
    ///
    /// # Panics
    /// Panics if the lock is poisoned or the identifier space is exhausted.
    /// For explicitly fallible behavior, use [`Self::try_submit`] instead.
    pub fn submit(&self, payload: P) -> RequestId {
        self.try_submit(payload).unwrap()
    }

    /// A fallible version of [`Self::submit`] that returns a [`Result`].
    ///
    /// The identifier is generated while the write lock is held, so the
    /// uniqueness check and the insert are one atomic step. An existing entry
    /// is never overwritten.
    ///
    /// # Errors
    /// - [`Error::IdSpaceExhausted`] if every generated identifier was taken.
    /// - `Error::LockPoisoned` if the std lock has been poisoned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
    pub fn try_submit(&self, payload: P) -> Result<RequestId> {
        let mut entries = lock::write(&self.entries)?;

        for _attempt in 1..=self.max_id_attempts {
            match entries.entry(self.generator.next_id()) {
                Entry::Occupied(_slot) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        id = %_slot.key(),
                        attempt = _attempt,
                        "identifier collision, regenerating"
                    );
                }
                Entry::Vacant(slot) => {
                    let id = slot.key().clone();
                    slot.insert(Request::new(payload));
                    return Ok(id);
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(
            attempts = self.max_id_attempts,
            id_len = self.generator.id_len(),
            "identifier space exhausted"
        );
        Err(Error::IdSpaceExhausted {
            attempts: self.max_id_attempts,
        })
    }

    /// Marks the request as [`RequestState::Finished`].
    ///
    /// Unknown identifiers are ignored. Completing an already finished
    /// request leaves it finished.
    ///
    /// # Panics
    /// Panics if the lock is poisoned. For explicitly fallible behavior, use
    /// [`Self::try_complete`] instead.
    pub fn complete(&self, id: &str) {
        self.try_complete(id).unwrap();
    }

    /// A fallible version of [`Self::complete`] that returns a [`Result`].
    ///
    /// # Errors
    /// - `Error::LockPoisoned` if the std lock has been poisoned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_complete(&self, id: &str) -> Result<()> {
        let mut entries = lock::write(&self.entries)?;
        if let Some(request) = entries.get_mut(id) {
            request.finish();
        }
        Ok(())
    }

    /// Returns the current state of the request, or
    /// [`RequestState::Unknown`] if no entry exists.
    ///
    /// # Panics
    /// Panics if the lock is poisoned. For explicitly fallible behavior, use
    /// [`Self::try_query`] instead.
    pub fn query(&self, id: &str) -> RequestState {
        self.try_query(id).unwrap()
    }

    /// A fallible version of [`Self::query`] that returns a [`Result`].
    ///
    /// # Errors
    /// - `Error::LockPoisoned` if the std lock has been poisoned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_query(&self, id: &str) -> Result<RequestState> {
        let entries = lock::read(&self.entries)?;
        Ok(entries
            .get(id)
            .map_or(RequestState::Unknown, Request::state))
    }

    /// Returns a snapshot of the entry, or `None` if no entry exists.
    ///
    /// # Panics
    /// Panics if the lock is poisoned. For explicitly fallible behavior, use
    /// [`Self::try_get`] instead.
    pub fn get(&self, id: &str) -> Option<Request<P>>
    where
        P: Clone,
    {
        self.try_get(id).unwrap()
    }

    /// A fallible version of [`Self::get`] that returns a [`Result`].
    ///
    /// # Errors
    /// - `Error::LockPoisoned` if the std lock has been poisoned.
    pub fn try_get(&self, id: &str) -> Result<Option<Request<P>>>
    where
        P: Clone,
    {
        let entries = lock::read(&self.entries)?;
        Ok(entries.get(id).cloned())
    }

    /// Removes the entry and returns it.
    ///
    /// This is the only way an entry ever leaves the registry. Later queries
    /// for the identifier answer [`RequestState::Unknown`], and the
    /// identifier may be assigned again by a later submission.
    ///
    /// # Panics
    /// Panics if the lock is poisoned. For explicitly fallible behavior, use
    /// [`Self::try_remove`] instead.
    pub fn remove(&self, id: &str) -> Option<Request<P>> {
        self.try_remove(id).unwrap()
    }

    /// A fallible version of [`Self::remove`] that returns a [`Result`].
    ///
    /// # Errors
    /// - `Error::LockPoisoned` if the std lock has been poisoned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_remove(&self, id: &str) -> Result<Option<Request<P>>> {
        let mut entries = lock::write(&self.entries)?;
        Ok(entries.remove(id))
    }

    /// Returns the number of entries.
    ///
    /// # Panics
    /// Panics if the lock is poisoned. For explicitly fallible behavior, use
    /// [`Self::try_len`] instead.
    pub fn len(&self) -> usize {
        self.try_len().unwrap()
    }

    /// A fallible version of [`Self::len`] that returns a [`Result`].
    ///
    /// # Errors
    /// - `Error::LockPoisoned` if the std lock has been poisoned.
    pub fn try_len(&self) -> Result<usize> {
        Ok(lock::read(&self.entries)?.len())
    }

    /// Returns `true` if the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P, R> core::fmt::Debug for Registry<P, R>
where
    R: RandSource<u64>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("id_len", &self.generator.id_len())
            .field("max_id_attempts", &self.max_id_attempts)
            .finish_non_exhaustive()
    }
}
