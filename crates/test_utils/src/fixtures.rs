//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the enrollment system.
//! These fixtures are designed to be consistent and predictable for unit tests.

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;

use core_kernel::Money;

/// Fixture for identity document test data
pub struct DocumentFixtures;

impl DocumentFixtures {
    /// A national ID with a correct check digit
    pub fn valid_national_id() -> &'static str {
        "0402084040"
    }

    /// A second valid national ID for multi-person scenarios
    pub fn other_national_id() -> &'static str {
        "1710034065"
    }

    /// A third valid national ID
    pub fn third_national_id() -> &'static str {
        "0926687856"
    }

    /// Ten digits whose check digit does not match
    pub fn bad_checksum_id() -> &'static str {
        "1234567890"
    }

    /// Ten identical digits; rejected regardless of the checksum
    pub fn repeated_digits_id() -> &'static str {
        "0000000000"
    }

    /// A well-formed passport value
    pub fn valid_passport() -> &'static str {
        "AB123456"
    }

    /// Purely numeric, so never accepted as a passport
    pub fn numeric_passport() -> &'static str {
        "12345678"
    }
}

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A typical course price
    pub fn course_price() -> Money {
        Money::new(dec!(350.00))
    }

    /// A typical discount amount
    pub fn discount_amount() -> Money {
        Money::new(dec!(50.00))
    }

    /// A zero amount
    pub fn zero() -> Money {
        Money::zero()
    }
}

/// Fixture for date test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A course start date comfortably in the future
    pub fn course_start() -> NaiveDate {
        let today = Utc::now().date_naive();
        today + chrono::Duration::days(60)
    }

    /// A course end date after [`TemporalFixtures::course_start`]
    pub fn course_end() -> NaiveDate {
        Self::course_start() + chrono::Duration::days(120)
    }
}

/// Fixture for common string test data
pub struct StringFixtures;

impl StringFixtures {
    pub fn email() -> &'static str {
        "maria@example.com"
    }

    pub fn invoice_number() -> &'static str {
        "001-001-000000123"
    }

    pub fn entry_number() -> &'static str {
        "ING-2026-0001"
    }

    pub fn tax_id() -> &'static str {
        "0402084040001"
    }
}
