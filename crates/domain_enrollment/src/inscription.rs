//! Inscription aggregate
//!
//! An inscription ties a person to a course together with billing info and
//! the payment receipt they uploaded. The `matriculated` flag only ever
//! moves from `false` to `true`; there is no un-matriculation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BillingInfoId, CourseId, DiscountId, InscriptionId, Money, PersonId, ReceiptId};
use domain_catalog::{final_amount, Course, Discount};
use domain_party::{BillingInfo, Person};

use crate::receipt::Receipt;

/// A person's registration in a course, pending or confirmed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inscription {
    /// Unique identifier
    pub id: InscriptionId,
    /// Course being enrolled in
    pub course_id: CourseId,
    /// Person enrolling
    pub person_id: PersonId,
    /// Billing details for invoicing
    pub billing_id: BillingInfoId,
    /// Uploaded payment receipt (one inscription per receipt)
    pub receipt_id: ReceiptId,
    /// Optional discount applied to the course price
    pub discount_id: Option<DiscountId>,
    /// Whether enrollment has been confirmed
    pub matriculated: bool,
    /// When the inscription was registered
    pub enrolled_at: DateTime<Utc>,
}

impl Inscription {
    /// Creates a pending inscription (`matriculated` starts false)
    pub fn new(request: NewInscription) -> Self {
        Self {
            id: InscriptionId::new_v7(),
            course_id: request.course_id,
            person_id: request.person_id,
            billing_id: request.billing_id,
            receipt_id: request.receipt_id,
            discount_id: request.discount_id,
            matriculated: false,
            enrolled_at: Utc::now(),
        }
    }

    /// Marks the inscription as matriculated
    ///
    /// Returns true only when this call performed the transition; calling
    /// on an already-matriculated inscription is a no-op.
    pub fn matriculate(&mut self) -> bool {
        if self.matriculated {
            return false;
        }
        self.matriculated = true;
        true
    }
}

/// Request payload for creating an inscription
#[derive(Debug, Clone)]
pub struct NewInscription {
    pub course_id: CourseId,
    pub person_id: PersonId,
    pub billing_id: BillingInfoId,
    pub receipt_id: ReceiptId,
    pub discount_id: Option<DiscountId>,
}

/// Partial update of an inscription
///
/// Absent fields keep their stored value. `matriculated` may only be raised;
/// the store rejects a `true -> false` request.
#[derive(Debug, Clone, Default)]
pub struct InscriptionUpdate {
    pub discount_id: Option<DiscountId>,
    pub matriculated: Option<bool>,
}

/// An inscription hydrated with its related entities
#[derive(Debug, Clone)]
pub struct InscriptionAggregate {
    pub inscription: Inscription,
    pub person: Person,
    pub course: Course,
    pub billing: BillingInfo,
    pub receipt: Receipt,
    pub discount: Option<Discount>,
}

impl InscriptionAggregate {
    /// Amount owed for this inscription after any discount
    pub fn payable_amount(&self) -> Money {
        final_amount(self.course.price, self.discount.as_ref())
    }
}
