use crate::DEFAULT_ID_LEN;

/// Default number of identifiers tried per submission before giving up.
pub const DEFAULT_MAX_ID_ATTEMPTS: usize = 16;

/// Construction-time settings for a [`Registry`].
///
/// [`Registry`]: crate::Registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Length of generated identifiers, in characters.
    pub id_len: usize,
    /// How many identifiers a submission may generate while looking for one
    /// that is not already taken. Values below 1 are treated as 1.
    pub max_id_attempts: usize,
}

impl RegistryConfig {
    /// Sets [`Self::id_len`].
    pub const fn with_id_len(mut self, id_len: usize) -> Self {
        self.id_len = id_len;
        self
    }

    /// Sets [`Self::max_id_attempts`].
    pub const fn with_max_id_attempts(mut self, max_id_attempts: usize) -> Self {
        self.max_id_attempts = max_id_attempts;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            id_len: DEFAULT_ID_LEN,
            max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS,
        }
    }
}
