//! Course and discount DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CourseId, DiscountId, Money};
use domain_catalog::{Course, CourseModality, Discount, DiscountKind, NewCourse, NewDiscount};

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub short_name: String,
    pub long_name: String,
    pub modality: CourseModality,
    pub price: Decimal,
    pub payment_link: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<CreateCourseRequest> for NewCourse {
    fn from(request: CreateCourseRequest) -> Self {
        NewCourse {
            short_name: request.short_name,
            long_name: request.long_name,
            modality: request.modality,
            price: Money::new(request.price),
            payment_link: request.payment_link,
            start_date: request.start_date,
            end_date: request.end_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: CourseId,
    pub short_name: String,
    pub long_name: String,
    pub modality: CourseModality,
    pub price: Decimal,
    pub payment_link: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            short_name: course.short_name,
            long_name: course.long_name,
            modality: course.modality,
            price: course.price.amount(),
            payment_link: course.payment_link,
            start_date: course.schedule.start(),
            end_date: course.schedule.end(),
            created_at: course.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDiscountRequest {
    pub kind: DiscountKind,
    pub amount_off: Decimal,
    pub percent_off: Option<Decimal>,
    pub description: String,
}

impl From<CreateDiscountRequest> for NewDiscount {
    fn from(request: CreateDiscountRequest) -> Self {
        NewDiscount {
            kind: request.kind,
            amount_off: Money::new(request.amount_off),
            percent_off: request.percent_off,
            description: request.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiscountResponse {
    pub id: DiscountId,
    pub kind: DiscountKind,
    pub amount_off: Decimal,
    pub percent_off: Option<Decimal>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Discount> for DiscountResponse {
    fn from(discount: Discount) -> Self {
        Self {
            id: discount.id,
            kind: discount.kind,
            amount_off: discount.amount_off.amount(),
            percent_off: discount.percent_off,
            description: discount.description,
            created_at: discount.created_at,
        }
    }
}
