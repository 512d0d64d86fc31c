//! Course entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CourseId, DateRange, Money};

use crate::error::CatalogError;

/// Delivery modality of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseModality {
    InPerson,
    Online,
    Hybrid,
}

/// A paid course offered in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier
    pub id: CourseId,
    /// Short name used in listings
    pub short_name: String,
    /// Full descriptive name
    pub long_name: String,
    /// Delivery modality
    pub modality: CourseModality,
    /// Price (two decimal places)
    pub price: Money,
    /// Payment link shared with participants
    pub payment_link: Option<String>,
    /// Start/end date window (start ≤ end)
    pub schedule: DateRange,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Creates a course, enforcing the schedule invariants
    ///
    /// The start date must not precede `today`; the input boundary supplies
    /// the current date so the rule stays testable.
    pub fn new(request: NewCourse, today: NaiveDate) -> Result<Self, CatalogError> {
        let schedule = DateRange::new(request.start_date, request.end_date)?;
        if schedule.start() < today {
            return Err(CatalogError::StartsInPast {
                start: schedule.start(),
            });
        }
        if request.short_name.trim().is_empty() {
            return Err(CatalogError::Validation("Short name is required".to_string()));
        }
        if request.price.is_negative() {
            return Err(CatalogError::Validation("Price cannot be negative".to_string()));
        }

        Ok(Self {
            id: CourseId::new_v7(),
            short_name: request.short_name,
            long_name: request.long_name,
            modality: request.modality,
            price: request.price,
            payment_link: request.payment_link,
            schedule,
            created_at: Utc::now(),
        })
    }

    /// Returns true if the course has not started as of `today`
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.schedule.starts_after(today)
    }
}

/// Request payload for creating a course
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub short_name: String,
    pub long_name: String,
    pub modality: CourseModality,
    pub price: Money,
    pub payment_link: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
