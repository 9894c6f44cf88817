use core::borrow::Borrow;
use core::fmt;

/// An opaque identifier assigned by the [`Registry`] at submission time.
///
/// Identifiers are random strings. They are unique within one registry (the
/// registry regenerates on collision) but carry no global uniqueness
/// guarantee.
///
/// `RequestId` borrows as `str`, so registry lookups accept plain string
/// slices, e.g. an identifier read back from a URL path.
///
/// [`Registry`]: crate::Registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RequestId(String);

impl RequestId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of characters in the identifier.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the zero-length identifier.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the identifier and returns the underlying `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<RequestId> for String {
    fn from(value: RequestId) -> Self {
        value.0
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RequestId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RequestId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RequestId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
