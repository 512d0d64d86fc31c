//! Identity document validation
//!
//! A participant identifies with one of two mutually exclusive document
//! shapes:
//!
//! 1. **National ID**: exactly 10 ASCII digits. The third digit encodes the
//!    province/type and must be in 0..=5, and the tenth digit is a weighted
//!    modulo-10 check digit over the first nine (weights 2,1,2,1,2,1,2,1,2;
//!    products above 9 are reduced by 9). Ten identical digits are rejected.
//! 2. **Passport**: 6 to 9 characters from `[A-Z0-9]`, not purely numeric.
//!
//! A purely numeric string that is not a valid 10-digit national ID is
//! rejected outright, never reinterpreted as a passport.
//!
//! Validation is pure and total: no I/O, deterministic, and never panics on
//! any input string.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Highest province/type digit allowed at position 2 of a national ID
const MAX_THIRD_DIGIT: u8 = 5;

/// Error returned for any document that matches neither accepted shape
///
/// The message deliberately names both shapes so callers can surface it
/// verbatim in a validation response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error(
        "Invalid identity document: expected a 10-digit national ID \
         or a 6-9 character passport (uppercase letters and digits)"
    )]
    InvalidDocument,
}

/// A validated, normalized identity document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IdentityDocument {
    NationalId(String),
    Passport(String),
}

impl IdentityDocument {
    /// Validates and normalizes a raw document string
    ///
    /// The input is trimmed; the normalized value is the trimmed string as
    /// validated. Returns [`IdentityError::InvalidDocument`] for any shape
    /// that is neither a checksummed national ID nor a passport.
    pub fn validate(raw: &str) -> Result<Self, IdentityError> {
        let trimmed = raw.trim();

        if trimmed.len() == 10 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return if national_id_is_valid(trimmed) {
                Ok(IdentityDocument::NationalId(trimmed.to_string()))
            } else {
                Err(IdentityError::InvalidDocument)
            };
        }

        // Any other purely numeric string is a malformed national ID, not a
        // passport candidate.
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentityError::InvalidDocument);
        }

        if passport_is_valid(trimmed) {
            return Ok(IdentityDocument::Passport(trimmed.to_string()));
        }

        Err(IdentityError::InvalidDocument)
    }

    /// Returns the normalized document value
    pub fn value(&self) -> &str {
        match self {
            IdentityDocument::NationalId(v) | IdentityDocument::Passport(v) => v,
        }
    }

    /// Returns a short tag for persistence ("national_id" / "passport")
    pub fn kind(&self) -> &'static str {
        match self {
            IdentityDocument::NationalId(_) => "national_id",
            IdentityDocument::Passport(_) => "passport",
        }
    }

    /// Reconstructs a document from its persisted kind tag and value
    ///
    /// Used by storage adapters reading rows that were validated on write.
    pub fn from_parts(kind: &str, value: &str) -> Result<Self, IdentityError> {
        match kind {
            "national_id" => Ok(IdentityDocument::NationalId(value.to_string())),
            "passport" => Ok(IdentityDocument::Passport(value.to_string())),
            _ => Err(IdentityError::InvalidDocument),
        }
    }
}

impl fmt::Display for IdentityDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Computes the check digit for the first nine digits of a national ID
///
/// Weights alternate 2,1 starting at 2; products above 9 are reduced by 9;
/// the check digit is `(10 - sum mod 10) mod 10`.
pub fn check_digit(first_nine: &[u8; 9]) -> u8 {
    let mut sum = 0u32;
    for (i, &d) in first_nine.iter().enumerate() {
        let mut product = u32::from(d) * if i % 2 == 0 { 2 } else { 1 };
        if product > 9 {
            product -= 9;
        }
        sum += product;
    }
    ((10 - sum % 10) % 10) as u8
}

fn national_id_is_valid(digits: &str) -> bool {
    debug_assert_eq!(digits.len(), 10);
    let d: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();

    if d[2] > MAX_THIRD_DIGIT {
        return false;
    }

    // A sequence of ten identical digits can satisfy the checksum but is
    // never a real document.
    if d.iter().all(|&x| x == d[0]) {
        return false;
    }

    let mut first_nine = [0u8; 9];
    first_nine.copy_from_slice(&d[..9]);
    check_digit(&first_nine) == d[9]
}

fn passport_is_valid(value: &str) -> bool {
    if value.len() < 6 || value.len() > 9 {
        return false;
    }
    if !value
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    {
        return false;
    }
    // Purely numeric strings were already rejected, but keep the shape rule
    // self-contained.
    !value.bytes().all(|b| b.is_ascii_digit())
}
