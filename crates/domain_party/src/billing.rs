//! Billing information
//!
//! Invoicing data for a payer. A single billing record may back multiple
//! inscriptions (a company paying for several participants, a parent paying
//! for several courses).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::BillingInfoId;

/// Billing details used when issuing invoices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingInfo {
    /// Unique identifier
    pub id: BillingInfoId,
    /// Legal name on the invoice
    pub legal_name: String,
    /// Tax identification number
    pub tax_id: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Billing email
    pub email: String,
    /// Postal address
    pub address: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl BillingInfo {
    /// Creates a new billing record
    pub fn new(request: NewBillingInfo) -> Self {
        Self {
            id: BillingInfoId::new_v7(),
            legal_name: request.legal_name,
            tax_id: request.tax_id,
            phone: request.phone,
            email: request.email,
            address: request.address,
            created_at: Utc::now(),
        }
    }
}

/// Request payload for creating billing information
#[derive(Debug, Clone)]
pub struct NewBillingInfo {
    pub legal_name: String,
    pub tax_id: String,
    pub phone: Option<String>,
    pub email: String,
    pub address: Option<String>,
}
