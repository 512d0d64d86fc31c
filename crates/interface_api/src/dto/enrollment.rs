//! Inscription and invoice DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{BillingInfoId, DiscountId, InscriptionId, InvoiceId};
use domain_enrollment::{
    InscriptionAggregate, InscriptionUpdate, Invoice, NewInscription, NewInvoice,
};

use super::catalog::{CourseResponse, DiscountResponse};
use super::registry::{PersonResponse, ReceiptResponse};

#[derive(Debug, Deserialize)]
pub struct CreateInscriptionRequest {
    pub course_id: Uuid,
    pub person_id: Uuid,
    pub billing_id: Uuid,
    pub receipt_id: Uuid,
    pub discount_id: Option<Uuid>,
}

impl From<CreateInscriptionRequest> for NewInscription {
    fn from(request: CreateInscriptionRequest) -> Self {
        NewInscription {
            course_id: request.course_id.into(),
            person_id: request.person_id.into(),
            billing_id: request.billing_id.into(),
            receipt_id: request.receipt_id.into(),
            discount_id: request.discount_id.map(DiscountId::from),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateInscriptionRequest {
    pub discount_id: Option<Uuid>,
    pub matriculated: Option<bool>,
}

impl From<UpdateInscriptionRequest> for InscriptionUpdate {
    fn from(request: UpdateInscriptionRequest) -> Self {
        InscriptionUpdate {
            discount_id: request.discount_id.map(DiscountId::from),
            matriculated: request.matriculated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InscriptionResponse {
    pub id: InscriptionId,
    pub person: PersonResponse,
    pub course: CourseResponse,
    pub billing_id: BillingInfoId,
    pub receipt: ReceiptResponse,
    pub discount: Option<DiscountResponse>,
    pub matriculated: bool,
    /// Course price minus the applied discount, floored at zero
    pub payable_amount: Decimal,
    pub enrolled_at: DateTime<Utc>,
}

impl From<InscriptionAggregate> for InscriptionResponse {
    fn from(aggregate: InscriptionAggregate) -> Self {
        let payable_amount = aggregate.payable_amount().amount();
        Self {
            id: aggregate.inscription.id,
            person: aggregate.person.into(),
            course: aggregate.course.into(),
            billing_id: aggregate.inscription.billing_id,
            receipt: aggregate.receipt.into(),
            discount: aggregate.discount.map(DiscountResponse::from),
            matriculated: aggregate.inscription.matriculated,
            payable_amount,
            enrolled_at: aggregate.inscription.enrolled_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub inscription_id: Uuid,
    pub billing_id: Uuid,
    pub amount_paid: Decimal,
    pub entry_number: String,
    pub invoice_number: String,
}

impl From<CreateInvoiceRequest> for NewInvoice {
    fn from(request: CreateInvoiceRequest) -> Self {
        NewInvoice {
            inscription_id: request.inscription_id.into(),
            billing_id: request.billing_id.into(),
            amount_paid: request.amount_paid,
            entry_number: request.entry_number,
            invoice_number: request.invoice_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: InvoiceId,
    pub inscription_id: InscriptionId,
    pub billing_id: BillingInfoId,
    pub amount_paid: Decimal,
    pub entry_number: String,
    pub invoice_number: String,
    pub payment_verified: bool,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            inscription_id: invoice.inscription_id,
            billing_id: invoice.billing_id,
            amount_paid: invoice.amount_paid.amount(),
            entry_number: invoice.entry_number,
            invoice_number: invoice.invoice_number,
            payment_verified: invoice.payment_verified,
            created_at: invoice.created_at,
            verified_at: invoice.verified_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResendInviteResponse {
    pub sent: bool,
}
