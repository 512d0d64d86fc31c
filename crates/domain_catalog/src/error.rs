//! Catalog domain errors

use chrono::NaiveDate;
use thiserror::Error;

use core_kernel::TemporalError;

/// Errors that can occur in the catalog domain
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Schedule bounds are inverted
    #[error(transparent)]
    Temporal(#[from] TemporalError),

    /// Course start date precedes the current date
    #[error("Course start date {start} is in the past")]
    StartsInPast { start: NaiveDate },

    /// Input failed validation
    #[error("Validation failed: {0}")]
    Validation(String),
}
