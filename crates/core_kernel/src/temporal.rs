//! Temporal types for course schedules
//!
//! Courses run over a calendar date window. The invariant (start ≤ end) is
//! enforced at construction so a `DateRange` is always well-formed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur constructing temporal values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// An inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a date range, rejecting inverted bounds
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the start date
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the end date
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `date` falls within the range (inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns true if the range has not started as of `today`
    pub fn starts_after(&self, today: NaiveDate) -> bool {
        self.start > today
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
