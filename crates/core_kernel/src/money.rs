//! Money with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary amounts using
//! rust_decimal for precise calculations without floating-point errors. The
//! system bills in a single currency, so Money carries only the amount, fixed
//! at two decimal places.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use thiserror::Error;

/// Number of decimal places carried by all monetary amounts
pub const MONEY_SCALE: u32 = 2;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must have exactly {MONEY_SCALE} fractional digits, found scale {0}")]
    InvalidScale(u32),

    #[error("Amount must be positive, found {0}")]
    NotPositive(Decimal),
}

/// A monetary amount with two decimal places
///
/// `Money::new` rounds the input to two decimal places. Callers that must
/// reject imprecise input (invoice amounts) use [`Money::try_exact`], which
/// fails unless the value already carries exactly two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new Money value, rounding to two decimal places
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(MONEY_SCALE))
    }

    /// Creates Money from an integer amount in minor units (cents)
    pub fn from_minor(minor_units: i64) -> Self {
        Self::new(Decimal::new(minor_units, MONEY_SCALE))
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self(dec!(0.00))
    }

    /// Validates that `amount` is positive with exactly two fractional digits
    ///
    /// Invoice paid amounts are human-entered and must not be silently
    /// rounded; `100.5` and `100.000` are both rejected.
    pub fn try_exact(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.scale() != MONEY_SCALE {
            return Err(MoneyError::InvalidScale(amount.scale()));
        }
        if amount <= Decimal::ZERO {
            return Err(MoneyError::NotPositive(amount));
        }
        Ok(Self(amount))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Subtracts `other`, flooring the result at zero
    ///
    /// Discount application never produces a negative payable amount.
    pub fn saturating_sub(&self, other: Money) -> Money {
        if other.0 >= self.0 {
            Money::zero()
        } else {
            Money::new(self.0 - other.0)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.0 - other.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}
