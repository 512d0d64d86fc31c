//! Integration tests for the catalog domain

use chrono::NaiveDate;
use domain_catalog::{final_amount, Course, CourseModality, Discount, DiscountKind, NewCourse, NewDiscount};
use core_kernel::Money;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_course_price_flows_through_discount_calculation() {
    let course = Course::new(
        NewCourse {
            short_name: "DATA-201".to_string(),
            long_name: "Applied Data Engineering".to_string(),
            modality: CourseModality::Hybrid,
            price: Money::new(dec!(350.00)),
            payment_link: Some("https://pay.example.com/data-201".to_string()),
            start_date: date(2026, 10, 5),
            end_date: date(2027, 2, 20),
        },
        date(2026, 8, 26),
    )
    .unwrap();

    let discount = Discount::new(NewDiscount {
        kind: DiscountKind::Group,
        amount_off: Money::new(dec!(50.00)),
        percent_off: None,
        description: "Group of three or more".to_string(),
    });

    assert_eq!(final_amount(course.price, None).amount(), dec!(350.00));
    assert_eq!(
        final_amount(course.price, Some(&discount)).amount(),
        dec!(300.00)
    );
}

#[test]
fn test_scholarship_larger_than_price_yields_zero() {
    let price = Money::new(dec!(80.00));
    let discount = Discount::new(NewDiscount {
        kind: DiscountKind::Scholarship,
        amount_off: Money::new(dec!(100.00)),
        percent_off: Some(dec!(100)),
        description: "Full scholarship".to_string(),
    });

    assert!(final_amount(price, Some(&discount)).is_zero());
}
