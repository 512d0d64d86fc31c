//! Person, billing and receipt DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BillingInfoId, PersonId, ReceiptId};
use domain_enrollment::Receipt;
use domain_party::{BillingInfo, NewBillingInfo, NewPerson, Person, UpdateContact};

#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    pub document: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub locale: Option<String>,
}

impl From<CreatePersonRequest> for NewPerson {
    fn from(request: CreatePersonRequest) -> Self {
        NewPerson {
            document: request.document,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            locale: request.locale,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub locale: Option<String>,
}

impl From<UpdateContactRequest> for UpdateContact {
    fn from(request: UpdateContactRequest) -> Self {
        UpdateContact {
            email: request.email,
            phone: request.phone,
            locale: request.locale,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PersonResponse {
    pub id: PersonId,
    pub document_kind: String,
    pub document: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub locale: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            document_kind: person.document.kind().to_string(),
            document: person.document.value().to_string(),
            first_name: person.first_name,
            last_name: person.last_name,
            email: person.email,
            phone: person.phone,
            locale: person.locale,
            created_at: person.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBillingRequest {
    pub legal_name: String,
    pub tax_id: String,
    pub phone: Option<String>,
    pub email: String,
    pub address: Option<String>,
}

impl From<CreateBillingRequest> for NewBillingInfo {
    fn from(request: CreateBillingRequest) -> Self {
        NewBillingInfo {
            legal_name: request.legal_name,
            tax_id: request.tax_id,
            phone: request.phone,
            email: request.email,
            address: request.address,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BillingResponse {
    pub id: BillingInfoId,
    pub legal_name: String,
    pub tax_id: String,
    pub phone: Option<String>,
    pub email: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BillingInfo> for BillingResponse {
    fn from(billing: BillingInfo) -> Self {
        Self {
            id: billing.id,
            legal_name: billing.legal_name,
            tax_id: billing.tax_id,
            phone: billing.phone,
            email: billing.email,
            address: billing.address,
            created_at: billing.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub id: ReceiptId,
    pub original_filename: String,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Receipt> for ReceiptResponse {
    fn from(receipt: Receipt) -> Self {
        Self {
            id: receipt.id,
            original_filename: receipt.original_filename,
            mime_type: receipt.mime_type,
            uploaded_at: receipt.uploaded_at,
        }
    }
}
