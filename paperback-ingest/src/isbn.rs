//! ISBN-10/13 checksum validation
//!
//! Pure, no side effects. A candidate passes a format gate first (optional
//! "ISBN"/"ISBN-10:"/"ISBN-13:" prefix, hyphens and spaces permitted, final
//! ISBN-10 character may be 'X'), then its check digit is recomputed and
//! compared against the one it carries.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Why a candidate is not a valid ISBN
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IsbnError {
    /// Candidate does not look like an ISBN-10 or ISBN-13 at all
    #[error("not in ISBN-10/13 format")]
    Format,

    /// Well-formed, but the check digit does not match
    #[error("check digit mismatch")]
    CheckDigit,
}

static PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ISBN(?:-1[03])?:? ").unwrap());

// Digit grouping: optional 978/979 prefix, then registration/registrant/
// publication groups, then the check character.
static STRUCTURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:97[89][- ]?)?[0-9]{1,5}[- ]?(?:[0-9]+[- ]?){2}[0-9X]$").unwrap());

/// Validate an ISBN-10 or ISBN-13 candidate string
pub fn validate_isbn(candidate: &str) -> Result<(), IsbnError> {
    let body = PREFIX.replace(candidate, "");

    if !passes_length_gate(&body) || !STRUCTURE.is_match(&body) {
        return Err(IsbnError::Format);
    }

    let mut chars: Vec<char> = body
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X')
        .collect();
    let carried = chars.pop().ok_or(IsbnError::Format)?;

    let computed = match chars.len() {
        9 => isbn10_check_char(&chars)?,
        12 => isbn13_check_char(&chars)?,
        _ => return Err(IsbnError::Format),
    };

    if computed == carried {
        Ok(())
    } else {
        Err(IsbnError::CheckDigit)
    }
}

/// Length/charset gate: 13 digits with separators, 10 chars with separators,
/// or 10 bare chars ending in a digit or X
fn passes_length_gate(body: &str) -> bool {
    let is_17 = body.len() == 17
        && body
            .bytes()
            .all(|b| matches!(b, b'-' | b' ' | b'0'..=b'9'));
    let is_13 = body.len() == 13
        && body
            .bytes()
            .all(|b| matches!(b, b'-' | b' ' | b'X' | b'0'..=b'9'));
    let is_10 = body.len() == 10
        && body.bytes().all(|b| matches!(b, b'X' | b'0'..=b'9'));

    is_17 || is_13 || is_10
}

/// ISBN-10: weights 10 down to 2; check = 11 - (sum mod 11); 10 -> 'X', 11 -> '0'
fn isbn10_check_char(digits: &[char]) -> Result<char, IsbnError> {
    let mut sum = 0u32;
    let mut weight = 10u32;
    for c in digits {
        sum += weight * c.to_digit(10).ok_or(IsbnError::Format)?;
        weight -= 1;
    }
    Ok(match 11 - (sum % 11) {
        10 => 'X',
        11 => '0',
        d => char::from_digit(d, 10).expect("single digit"),
    })
}

/// ISBN-13: weights alternate 1/3 by position; check = 10 - (sum mod 10); 10 -> '0'
fn isbn13_check_char(digits: &[char]) -> Result<char, IsbnError> {
    let mut sum = 0u32;
    for (i, c) in digits.iter().enumerate() {
        let weight = if i % 2 == 0 { 1 } else { 3 };
        sum += weight * c.to_digit(10).ok_or(IsbnError::Format)?;
    }
    Ok(match 10 - (sum % 10) {
        10 => '0',
        d => char::from_digit(d, 10).expect("single digit"),
    })
}
