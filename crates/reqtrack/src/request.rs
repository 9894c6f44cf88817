use crate::RequestState;

/// A unit of submitted work: an opaque payload and its lifecycle state.
///
/// A `Request` does not know its own identifier. The [`Registry`] assigns the
/// identifier at submission and owns the entry from then on; callers only see
/// copies obtained through [`Registry::get`] or [`Registry::remove`].
///
/// [`Registry`]: crate::Registry
/// [`Registry::get`]: crate::Registry::get
/// [`Registry::remove`]: crate::Registry::remove
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Request<P = i64> {
    payload: P,
    state: RequestState,
}

impl<P> Request<P> {
    /// Creates a request in the [`RequestState::New`] state.
    pub const fn new(payload: P) -> Self {
        Self {
            payload,
            state: RequestState::New,
        }
    }

    /// Returns the payload.
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// Consumes the request and returns its payload.
    pub fn into_payload(self) -> P {
        self.payload
    }

    /// Returns the current state.
    pub const fn state(&self) -> RequestState {
        self.state
    }

    pub(crate) fn finish(&mut self) {
        self.state = RequestState::Finished;
    }
}
