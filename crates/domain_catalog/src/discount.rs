//! Discounts and final-amount calculation
//!
//! A discount carries an absolute amount off (authoritative) and an optional
//! percentage kept for display. Whoever creates the discount is responsible
//! for reflecting any percentage in `amount_off`; the calculator never
//! applies `percent_off` a second time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{DiscountId, Money};

/// Category of discount, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    EarlyBird,
    Group,
    Scholarship,
    Promotional,
    Other,
}

/// A named price reduction referenced optionally by inscriptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discount {
    /// Unique identifier
    pub id: DiscountId,
    /// Category
    pub kind: DiscountKind,
    /// Absolute amount deducted from the course price (authoritative)
    pub amount_off: Money,
    /// Display-only percentage; already reflected in `amount_off`
    pub percent_off: Option<Decimal>,
    /// Human-readable description
    pub description: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Discount {
    /// Creates a new discount
    pub fn new(request: NewDiscount) -> Self {
        Self {
            id: DiscountId::new_v7(),
            kind: request.kind,
            amount_off: request.amount_off,
            percent_off: request.percent_off,
            description: request.description,
            created_at: Utc::now(),
        }
    }
}

/// Request payload for creating a discount
#[derive(Debug, Clone)]
pub struct NewDiscount {
    pub kind: DiscountKind,
    pub amount_off: Money,
    pub percent_off: Option<Decimal>,
    pub description: String,
}

/// Computes the payable amount for a course price and an optional discount
///
/// Without a discount the price passes through unchanged. With one, the
/// absolute `amount_off` is subtracted and the result floored at zero.
pub fn final_amount(course_price: Money, discount: Option<&Discount>) -> Money {
    match discount {
        None => course_price,
        Some(d) => course_price.saturating_sub(d.amount_off),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn final_amount_never_negative_and_never_exceeds_price(
            price in 0i64..10_000_000i64,
            off in 0i64..10_000_000i64,
        ) {
            let price = Money::from_minor(price);
            let d = Discount::new(NewDiscount {
                kind: DiscountKind::Promotional,
                amount_off: Money::from_minor(off),
                percent_off: None,
                description: String::new(),
            });

            let result = final_amount(price, Some(&d));
            prop_assert!(!result.is_negative());
            prop_assert!(result <= price);
        }
    }
}
