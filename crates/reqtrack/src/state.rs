use core::fmt;
use core::str::FromStr;

/// The lifecycle state of a submitted request.
///
/// The only transition the registry performs is `New -> Finished`, through
/// [`Registry::complete`]. `Finished` is terminal.
///
/// - [`RequestState::Unknown`] is never stored. It is what
///   [`Registry::query`] answers for an identifier it has no entry for.
/// - [`RequestState::Busy`] is reserved. No registry operation produces it.
///
/// [`Registry::complete`]: crate::Registry::complete
/// [`Registry::query`]: crate::Registry::query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestState {
    /// Not-found sentinel.
    Unknown,
    /// Submitted and not yet completed.
    New,
    /// Reserved for an in-progress state.
    Busy,
    /// Completed. Terminal.
    Finished,
}

impl RequestState {
    /// Returns the canonical name of the state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::New => "New",
            Self::Busy => "Busy",
            Self::Finished => "Finished",
        }
    }

    /// Returns `true` for states that accept no further transition.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`RequestState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStateError;

impl fmt::Display for ParseStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unrecognized request state")
    }
}

impl core::error::Error for ParseStateError {}

impl FromStr for RequestState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unknown" => Ok(Self::Unknown),
            "New" => Ok(Self::New),
            "Busy" => Ok(Self::Busy),
            "Finished" => Ok(Self::Finished),
            _ => Err(ParseStateError),
        }
    }
}
