pub type Result<T, E = IdNumberError> = core::result::Result<T, E>;

/// Reasons an identity number is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdNumberError {
    /// The input is not exactly 13 characters long.
    #[error("invalid length: expected 13 characters, got {len}")]
    InvalidLength { len: usize },

    /// The input contains something other than ASCII digits.
    #[error("non-numeric character {found:?} at position {position}")]
    NonNumeric { position: usize, found: char },

    /// The leading `YYMMDD` block is not a calendar date.
    #[error("invalid date of birth: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The Luhn checksum over all 13 digits does not end in zero.
    #[error("checksum mismatch: digit sum {sum} is not a multiple of 10")]
    ChecksumMismatch { sum: u32 },
}
