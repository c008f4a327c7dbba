//! This file provides the pure per-value conversions
//! used by the table cleaners.
//! None of them touches a table; each one maps a single raw field
//! to its cleaned integer form.

use crate::{Error, Result};
use crate::common::constants::{
    SENTINEL_TOLERANCE,
    TIME_BUCKET_MINUTES,
    UNKNOWN,
};


/// Convert a length expressed in metres to an integer number of
/// centimetres, truncating toward zero.
/// The raw text may use a comma as the decimal separator.
///
/// A value within [`SENTINEL_TOLERANCE`] of exactly `-1` is the
/// out-of-band "unknown" marker and is returned unscaled;
/// scaling it would turn `-1` into `-100` and corrupt the column.
///
/// # Example
/// ```
/// use accidata::transform::length_to_centimetres;
///
/// assert_eq!(length_to_centimetres("4,50").unwrap(), 450);
/// assert_eq!(length_to_centimetres("-1,0000").unwrap(), -1);
/// ```
#[inline]
pub fn length_to_centimetres(raw: &str) -> Result<i64> {
    let text = raw.trim().replace(',', ".");
    let metres = text.parse::<f64>()
        .map_err(|_| malformed(raw, "expected a decimal length in metres"))?;

    if (metres - UNKNOWN as f64).abs() < SENTINEL_TOLERANCE {
        return Ok(UNKNOWN);
    }
    Ok((metres * 100f64).trunc() as i64)
}


/// Derive an age from a birth year and the record year.
/// A missing birth year is imputed as `year + 1`,
/// so the derived age becomes the [`UNKNOWN`] sentinel.
///
/// # Example
/// ```
/// use accidata::transform::age_from_birth_year;
///
/// assert_eq!(age_from_birth_year(Some(1990), 2020), 30);
/// assert_eq!(age_from_birth_year(None, 2020), -1);
/// ```
#[inline]
pub fn age_from_birth_year(birth: Option<i64>, year: i64) -> i64 {
    let birth = birth.unwrap_or(year + 1);
    year - birth
}


/// Parse a field stored as a hexadecimal token into its integer value.
/// The sign is honored so the literal `-1` sentinel round-trips.
///
/// # Example
/// ```
/// use accidata::transform::hex_to_decimal;
///
/// assert_eq!(hex_to_decimal("1F").unwrap(), 31);
/// assert_eq!(hex_to_decimal("-1").unwrap(), -1);
/// ```
#[inline]
pub fn hex_to_decimal(raw: &str) -> Result<i64> {
    i64::from_str_radix(raw.trim(), 16)
        .map_err(|_| malformed(raw, "expected a hexadecimal token"))
}


/// Convert an `HHMM` time token to a coarse bucket index:
/// minutes since midnight, integer-divided by [`TIME_BUCKET_MINUTES`].
/// The token must be exactly four ASCII digits;
/// any other shape is rejected.
///
/// # Example
/// ```
/// use accidata::transform::time_bucket;
///
/// // 14:37 -> 877 minutes -> bucket 73.
/// assert_eq!(time_bucket("1437").unwrap(), 73);
/// ```
#[inline]
pub fn time_bucket(raw: &str) -> Result<i64> {
    let text = raw.trim();
    let digits = text.as_bytes();
    if digits.len() != 4 || !digits.iter().all(u8::is_ascii_digit) {
        return Err(malformed(raw, "expected a four-digit HHMM time token"));
    }

    let hours = (digits[0] - b'0') as i64 * 10 + (digits[1] - b'0') as i64;
    let minutes = (digits[2] - b'0') as i64 * 10 + (digits[3] - b'0') as i64;

    Ok((hours * 60 + minutes) / TIME_BUCKET_MINUTES)
}


/// Parse a lane count. The source files carry the literal error token
/// `#ERREUR` in this column, which maps to the [`UNKNOWN`] sentinel.
///
/// # Example
/// ```
/// use accidata::transform::lane_count;
///
/// assert_eq!(lane_count("3").unwrap(), 3);
/// assert_eq!(lane_count("#ERREUR").unwrap(), -1);
/// ```
#[inline]
pub fn lane_count(raw: &str) -> Result<i64> {
    let text = raw.trim();
    if text == "#ERREUR" {
        return Ok(UNKNOWN);
    }
    text.parse::<i64>()
        .map_err(|_| malformed(raw, "expected an integer lane count"))
}


/// Build a [`Error::MalformedField`] without a column name.
/// The cleaner attaches the column via [`Error::in_column`].
#[inline]
fn malformed(value: &str, reason: &str) -> Error {
    Error::MalformedField {
        column: String::new(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
