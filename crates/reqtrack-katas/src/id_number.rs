//! Parsing for 13-digit identity numbers laid out as `YYMMDDSSSSCAZ`:
//!
//! - `YYMMDD`: date of birth
//! - `SSSS`: sequence number, `0000`-`4999` female, `5000`-`9999` male
//! - `C`: `0` for citizens, anything else for residents
//! - `A`: unused
//! - `Z`: Luhn check digit over the preceding twelve

use crate::{IdNumberError, Result};
use core::fmt;

/// Number of characters in an identity number.
pub const ID_NUMBER_LEN: usize = 13;

/// Lowest sequence number assigned to men.
const MALE_SEQUENCE_START: u32 = 5000;

/// Gender encoded in the sequence block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Male => "Male",
            Self::Female => "Female",
        })
    }
}

/// The attributes extracted from a valid identity number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdNumber {
    birth_year: i32,
    birth_month: u32,
    birth_day: u32,
    gender: Gender,
    citizen: bool,
    age: i32,
}

impl IdNumber {
    /// Validates `candidate` and extracts its attributes.
    ///
    /// Only two digits of the birth year are encoded. The century is chosen
    /// so that the birth year does not lie after `reference_year`, and the
    /// age is the difference in calendar years between the two.
    ///
    /// # Errors
    /// - [`IdNumberError::InvalidLength`] unless exactly 13 characters
    /// - [`IdNumberError::NonNumeric`] on any non-digit
    /// - [`IdNumberError::InvalidDate`] if `YYMMDD` is not a calendar date,
    ///   or no birth year fits in an `i32` for this `reference_year`
    /// - [`IdNumberError::ChecksumMismatch`] if the Luhn sum is not a
    ///   multiple of 10
    pub fn parse(candidate: &str, reference_year: i32) -> Result<Self> {
        let digits = parse_digits(candidate)?;

        let yy = number(&digits[0..2]) as i32;
        let month = number(&digits[2..4]);
        let day = number(&digits[4..6]);
        let Some(birth_year) = resolve_century(yy, reference_year) else {
            return Err(IdNumberError::InvalidDate {
                year: yy,
                month,
                day,
            });
        };
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(birth_year, month) {
            return Err(IdNumberError::InvalidDate {
                year: birth_year,
                month,
                day,
            });
        }

        let sum = luhn_sum(&digits);
        if sum % 10 != 0 {
            return Err(IdNumberError::ChecksumMismatch { sum });
        }

        let gender = if number(&digits[6..10]) >= MALE_SEQUENCE_START {
            Gender::Male
        } else {
            Gender::Female
        };

        Ok(Self {
            birth_year,
            birth_month: month,
            birth_day: day,
            gender,
            citizen: digits[10] == 0,
            age: reference_year - birth_year,
        })
    }

    pub const fn gender(&self) -> Gender {
        self.gender
    }

    /// Age in whole calendar years relative to the parse reference year.
    pub const fn age(&self) -> i32 {
        self.age
    }

    pub const fn is_citizen(&self) -> bool {
        self.citizen
    }

    /// Date of birth as `(year, month, day)`.
    pub const fn birth_date(&self) -> (i32, u32, u32) {
        (self.birth_year, self.birth_month, self.birth_day)
    }
}

fn parse_digits(candidate: &str) -> Result<[u8; ID_NUMBER_LEN]> {
    let len = candidate.chars().count();
    if len != ID_NUMBER_LEN {
        return Err(IdNumberError::InvalidLength { len });
    }

    let mut digits = [0_u8; ID_NUMBER_LEN];
    for (position, found) in candidate.chars().enumerate() {
        let Some(digit) = found.to_digit(10) else {
            return Err(IdNumberError::NonNumeric { position, found });
        };
        digits[position] = digit as u8;
    }
    Ok(digits)
}

fn number(digits: &[u8]) -> u32 {
    digits.iter().fold(0, |acc, &d| acc * 10 + u32::from(d))
}

/// Returns `None` when no century places the birth year inside `i32`.
fn resolve_century(yy: i32, reference_year: i32) -> Option<i32> {
    let century = reference_year.div_euclid(100).checked_mul(100)?;
    match century.checked_add(yy) {
        Some(year) if year <= reference_year => Some(year),
        _ => century.checked_sub(100)?.checked_add(yy),
    }
}

const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Luhn digit sum: walking from the rightmost digit, every second digit is
/// doubled and reduced by 9 when it exceeds 9.
fn luhn_sum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = u32::from(d);
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum()
}
