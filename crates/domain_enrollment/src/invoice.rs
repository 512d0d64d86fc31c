//! Invoices and payment verification state
//!
//! An invoice records what was actually paid for an inscription. The
//! `payment_verified` flag starts false and is raised exactly once by the
//! back office after checking the bank movement; that transition is what
//! triggers matriculation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{BillingInfoId, InscriptionId, InvoiceId, Money};

use crate::error::InvoiceError;

/// Maximum accepted length for invoice and entry numbers
pub const MAX_NUMBER_LEN: usize = 100;

/// An invoice issued for an inscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Inscription this invoice belongs to
    pub inscription_id: InscriptionId,
    /// Billing details the invoice was issued against
    pub billing_id: BillingInfoId,
    /// Amount actually paid (two decimal places, strictly positive)
    pub amount_paid: Money,
    /// Accounting entry number (unique)
    pub entry_number: String,
    /// Fiscal invoice number (unique)
    pub invoice_number: String,
    /// Whether the back office has confirmed the payment
    pub payment_verified: bool,
    /// Issued timestamp
    pub created_at: DateTime<Utc>,
    /// When the payment was verified, if it has been
    pub verified_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Creates an invoice, validating document numbers and amount
    ///
    /// The fiscal invoice number must match `[A-Z0-9-]+`; the accounting
    /// entry number is free-form text, only bounded in length.
    pub fn new(request: NewInvoice) -> Result<Self, InvoiceError> {
        let amount_paid = Money::try_exact(request.amount_paid)?;
        check_number("invoice_number", &request.invoice_number)?;
        check_format("invoice_number", &request.invoice_number)?;
        check_number("entry_number", &request.entry_number)?;

        Ok(Self {
            id: InvoiceId::new_v7(),
            inscription_id: request.inscription_id,
            billing_id: request.billing_id,
            amount_paid,
            entry_number: request.entry_number,
            invoice_number: request.invoice_number,
            payment_verified: false,
            created_at: Utc::now(),
            verified_at: None,
        })
    }

    /// Marks the payment as verified
    ///
    /// Returns true only when this call performed the transition.
    pub fn verify(&mut self) -> bool {
        if self.payment_verified {
            return false;
        }
        self.payment_verified = true;
        self.verified_at = Some(Utc::now());
        true
    }
}

/// Request payload for issuing an invoice
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub inscription_id: InscriptionId,
    pub billing_id: BillingInfoId,
    pub amount_paid: Decimal,
    pub entry_number: String,
    pub invoice_number: String,
}

fn check_number(field: &'static str, value: &str) -> Result<(), InvoiceError> {
    if value.is_empty() {
        return Err(InvoiceError::EmptyNumber { field });
    }
    if value.len() > MAX_NUMBER_LEN {
        return Err(InvoiceError::NumberTooLong { field });
    }
    Ok(())
}

fn check_format(field: &'static str, value: &str) -> Result<(), InvoiceError> {
    let well_formed = value
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-');
    if !well_formed {
        return Err(InvoiceError::MalformedNumber { field });
    }
    Ok(())
}
