use crate::RequestId;

/// A minimal interface for generating request identifiers.
pub trait IdGenerator {
    /// Returns a freshly generated identifier.
    ///
    /// Implementations are not required to guarantee uniqueness; the
    /// [`Registry`] checks every identifier against its live entries.
    ///
    /// [`Registry`]: crate::Registry
    fn next_id(&self) -> RequestId;
}
