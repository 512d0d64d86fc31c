//! Enrollment orchestration service
//!
//! Coordinates the persistence port and the matriculation notifier. The
//! service never talks to the integrations directly: matriculation state is
//! committed through the store first and the fan-out runs afterwards, so a
//! failed platform call can never roll back a verified payment.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use core_kernel::{
    BillingInfoId, CourseId, DiscountId, InscriptionId, InvoiceId, PersonId, PortError, ReceiptId,
};
use domain_catalog::{Course, Discount, NewCourse, NewDiscount};
use domain_party::{
    validation::{validate_new_billing_info, validate_new_person},
    BillingInfo, IdentityDocument, NewBillingInfo, NewPerson, Person, UpdateContact,
};

use crate::inscription::{Inscription, InscriptionAggregate, InscriptionUpdate, NewInscription};
use crate::invoice::{Invoice, NewInvoice};
use crate::notifier::MatriculationNotifier;
use crate::ports::{EnrollmentStore, ReceiptStoragePort};
use crate::receipt::Receipt;

/// Application service for the enrollment domain
///
/// All dependencies arrive through the constructor so tests can substitute
/// in-memory doubles for the store, the notifier and the file storage.
pub struct EnrollmentService {
    store: Arc<dyn EnrollmentStore>,
    notifier: Arc<dyn MatriculationNotifier>,
    receipt_storage: Arc<dyn ReceiptStoragePort>,
}

impl EnrollmentService {
    pub fn new(
        store: Arc<dyn EnrollmentStore>,
        notifier: Arc<dyn MatriculationNotifier>,
        receipt_storage: Arc<dyn ReceiptStoragePort>,
    ) -> Self {
        Self {
            store,
            notifier,
            receipt_storage,
        }
    }

    // --- Registry ---

    /// Registers a person after validating their identity document
    pub async fn register_person(&self, request: NewPerson) -> Result<Person, PortError> {
        let result = validate_new_person(&request);
        if !result.is_valid {
            return Err(PortError::validation(result.errors.join("; ")));
        }
        // validate_new_person already checked the document shape
        let document = IdentityDocument::validate(&request.document)
            .map_err(|e| PortError::validation(e.to_string()))?;
        self.store
            .insert_person(Person::new(document, request))
            .await
    }

    pub async fn get_person(&self, id: PersonId) -> Result<Person, PortError> {
        self.store.get_person(id).await
    }

    pub async fn update_person_contact(
        &self,
        id: PersonId,
        update: UpdateContact,
    ) -> Result<Person, PortError> {
        self.store.update_person_contact(id, update).await
    }

    pub async fn register_billing_info(
        &self,
        request: NewBillingInfo,
    ) -> Result<BillingInfo, PortError> {
        let result = validate_new_billing_info(&request);
        if !result.is_valid {
            return Err(PortError::validation(result.errors.join("; ")));
        }
        self.store
            .insert_billing_info(BillingInfo::new(request))
            .await
    }

    pub async fn get_billing_info(&self, id: BillingInfoId) -> Result<BillingInfo, PortError> {
        self.store.get_billing_info(id).await
    }

    /// Stores a receipt file and records its metadata
    pub async fn upload_receipt(
        &self,
        content: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<Receipt, PortError> {
        if content.is_empty() {
            return Err(PortError::validation("Receipt file is empty"));
        }
        let stored = self
            .receipt_storage
            .store(content, filename, mime_type)
            .await?;
        self.store.insert_receipt(Receipt::from_stored(stored)).await
    }

    pub async fn get_receipt(&self, id: ReceiptId) -> Result<Receipt, PortError> {
        self.store.get_receipt(id).await
    }

    /// Deletes a receipt record and its stored file
    ///
    /// Fails with a conflict while an inscription still references it; the
    /// file is only removed once the record is gone. File removal is
    /// best-effort: once the record is deleted the operation has succeeded,
    /// and a storage failure is logged rather than returned.
    pub async fn delete_receipt(&self, id: ReceiptId) -> Result<(), PortError> {
        let receipt = self.store.get_receipt(id).await?;
        self.store.delete_receipt(id).await?;
        if let Err(error) = self.receipt_storage.delete(&receipt.storage_path).await {
            warn!(
                receipt_id = %id,
                path = %receipt.storage_path,
                %error,
                "Receipt record deleted but file removal failed"
            );
        }
        Ok(())
    }

    // --- Catalog ---

    pub async fn create_course(&self, request: NewCourse) -> Result<Course, PortError> {
        let course = Course::new(request, Utc::now().date_naive())
            .map_err(|e| PortError::validation(e.to_string()))?;
        self.store.insert_course(course).await
    }

    pub async fn get_course(&self, id: CourseId) -> Result<Course, PortError> {
        self.store.get_course(id).await
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, PortError> {
        self.store.list_courses().await
    }

    pub async fn create_discount(&self, request: NewDiscount) -> Result<Discount, PortError> {
        self.store.insert_discount(Discount::new(request)).await
    }

    pub async fn delete_discount(&self, id: DiscountId) -> Result<(), PortError> {
        self.store.delete_discount(id).await
    }

    // --- Inscriptions ---

    /// Creates an inscription after checking every referenced entity exists
    ///
    /// The uniqueness rules (one inscription per receipt, one per
    /// person-course pair) are enforced by the store on insert.
    #[instrument(skip(self))]
    pub async fn create_inscription(
        &self,
        request: NewInscription,
    ) -> Result<InscriptionAggregate, PortError> {
        self.store.get_person(request.person_id).await?;
        self.store.get_course(request.course_id).await?;
        self.store.get_billing_info(request.billing_id).await?;
        self.store.get_receipt(request.receipt_id).await?;
        if let Some(discount_id) = request.discount_id {
            self.store.get_discount(discount_id).await?;
        }

        let inscription = self
            .store
            .insert_inscription(Inscription::new(request))
            .await?;
        info!(inscription_id = %inscription.id, "Inscription created");
        self.store.get_inscription_aggregate(inscription.id).await
    }

    pub async fn get_inscription(
        &self,
        id: InscriptionId,
    ) -> Result<InscriptionAggregate, PortError> {
        self.store.get_inscription_aggregate(id).await
    }

    /// Applies a partial update; a false-to-true matriculation triggers the
    /// notification fan-out exactly once
    #[instrument(skip(self, update))]
    pub async fn update_inscription(
        &self,
        id: InscriptionId,
        update: InscriptionUpdate,
    ) -> Result<InscriptionAggregate, PortError> {
        if let Some(discount_id) = update.discount_id {
            self.store.get_discount(discount_id).await?;
        }

        let transition = self.store.update_inscription(id, update).await?;
        let aggregate = self.store.get_inscription_aggregate(id).await?;

        if transition.newly_matriculated {
            info!(inscription_id = %id, "Inscription matriculated, running fan-out");
            self.notifier.on_matriculated(&aggregate).await?;
        }

        Ok(aggregate)
    }

    // --- Invoices ---

    /// Issues an invoice for an inscription
    pub async fn create_invoice(&self, request: NewInvoice) -> Result<Invoice, PortError> {
        self.store.get_inscription(request.inscription_id).await?;
        self.store.get_billing_info(request.billing_id).await?;

        let invoice = Invoice::new(request)?;
        self.store.insert_invoice(invoice).await
    }

    pub async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, PortError> {
        self.store.get_invoice(id).await
    }

    /// Confirms a payment and matriculates the inscription
    ///
    /// The flag transitions are committed atomically by the store before the
    /// fan-out runs; if the platform call then fails, the error propagates
    /// but the verified state stands and remediation is manual.
    #[instrument(skip(self))]
    pub async fn verify_payment(&self, id: InvoiceId) -> Result<Invoice, PortError> {
        let verification = self.store.verify_invoice_payment(id).await?;

        if verification.newly_matriculated {
            let aggregate = self
                .store
                .get_inscription_aggregate(verification.invoice.inscription_id)
                .await?;
            info!(
                invoice_id = %id,
                inscription_id = %verification.invoice.inscription_id,
                "Payment verified, running fan-out"
            );
            self.notifier.on_matriculated(&aggregate).await?;
        }

        Ok(verification.invoice)
    }

    /// Resends the chat invite for a matriculated inscription
    ///
    /// Returns false, rather than an error, when nothing was sent.
    pub async fn resend_invite(&self, id: InscriptionId) -> Result<bool, PortError> {
        let aggregate = self.store.get_inscription_aggregate(id).await?;
        Ok(self.notifier.resend_invite(&aggregate).await)
    }
}
