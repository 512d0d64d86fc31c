//! Enrollment domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors raised while constructing an invoice
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Amount is not a positive value with exactly two decimal places
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// A document number was left empty
    #[error("Field '{field}' cannot be empty")]
    EmptyNumber { field: &'static str },

    /// A document number exceeds the accepted length
    #[error("Field '{field}' exceeds the maximum length")]
    NumberTooLong { field: &'static str },

    /// A document number contains characters outside A-Z, 0-9 and '-'
    #[error("Field '{field}' must contain only uppercase letters, digits and dashes")]
    MalformedNumber { field: &'static str },
}

impl InvoiceError {
    /// Name of the offending field, for boundary error payloads
    pub fn field(&self) -> &'static str {
        match self {
            Self::Money(_) => "amount_paid",
            Self::EmptyNumber { field }
            | Self::NumberTooLong { field }
            | Self::MalformedNumber { field } => field,
        }
    }
}

impl From<InvoiceError> for PortError {
    fn from(err: InvoiceError) -> Self {
        PortError::validation_field(err.to_string(), err.field())
    }
}
