//! Ports the enrollment domain needs from the outside world
//!
//! [`EnrollmentStore`] is the persistence port: the sole mutator for every
//! entity the orchestrator owns. Its implementations must enforce the
//! uniqueness rules (person document, receipt binding, person+course pair,
//! invoice and entry numbers) and perform the two verification flag
//! transitions as atomic compare-and-swap updates.
//!
//! The remaining traits cover the external enrollment integrations: the
//! course platform, the chat invite channel, the per-course mapping that
//! connects our catalog to both, and the receipt file storage.

use async_trait::async_trait;

use core_kernel::{
    BillingInfoId, CourseId, DiscountId, DomainPort, InscriptionId, InvoiceId, PersonId, PortError,
    ReceiptId,
};
use domain_catalog::{Course, Discount};
use domain_party::{BillingInfo, Person, UpdateContact};

use crate::inscription::{Inscription, InscriptionAggregate, InscriptionUpdate};
use crate::invoice::Invoice;
use crate::receipt::{Receipt, StoredReceipt};

/// Outcome of an inscription update
#[derive(Debug, Clone)]
pub struct InscriptionTransition {
    pub inscription: Inscription,
    /// True only when this update moved `matriculated` from false to true
    pub newly_matriculated: bool,
}

/// Outcome of a payment verification attempt
#[derive(Debug, Clone)]
pub struct PaymentVerification {
    pub invoice: Invoice,
    /// True only when this call moved `payment_verified` from false to true
    pub newly_verified: bool,
    /// True only when this call moved the inscription's `matriculated` flag
    pub newly_matriculated: bool,
}

/// Persistence port for the enrollment domain
///
/// Uniqueness violations surface as [`PortError::Conflict`], missing
/// entities as [`PortError::NotFound`]. Multi-entity transitions
/// (payment verification) are atomic: concurrent callers observe either
/// the before or the after state, never a partial write.
#[async_trait]
pub trait EnrollmentStore: DomainPort {
    // --- Persons ---

    /// Persists a person; conflicts if the identity document is taken
    async fn insert_person(&self, person: Person) -> Result<Person, PortError>;

    async fn get_person(&self, id: PersonId) -> Result<Person, PortError>;

    /// Applies a partial contact update and returns the stored person
    async fn update_person_contact(
        &self,
        id: PersonId,
        update: UpdateContact,
    ) -> Result<Person, PortError>;

    // --- Billing info ---

    async fn insert_billing_info(&self, billing: BillingInfo) -> Result<BillingInfo, PortError>;

    async fn get_billing_info(&self, id: BillingInfoId) -> Result<BillingInfo, PortError>;

    // --- Receipts ---

    async fn insert_receipt(&self, receipt: Receipt) -> Result<Receipt, PortError>;

    async fn get_receipt(&self, id: ReceiptId) -> Result<Receipt, PortError>;

    /// Deletes a receipt; conflicts while an inscription still references it
    async fn delete_receipt(&self, id: ReceiptId) -> Result<(), PortError>;

    // --- Courses ---

    async fn insert_course(&self, course: Course) -> Result<Course, PortError>;

    async fn get_course(&self, id: CourseId) -> Result<Course, PortError>;

    async fn list_courses(&self) -> Result<Vec<Course>, PortError>;

    // --- Discounts ---

    async fn insert_discount(&self, discount: Discount) -> Result<Discount, PortError>;

    async fn get_discount(&self, id: DiscountId) -> Result<Discount, PortError>;

    /// Deletes a discount; conflicts while an inscription still references it
    async fn delete_discount(&self, id: DiscountId) -> Result<(), PortError>;

    // --- Inscriptions ---

    /// Persists an inscription
    ///
    /// Conflicts if the receipt already backs another inscription or the
    /// person is already inscribed in the course.
    async fn insert_inscription(&self, inscription: Inscription)
        -> Result<Inscription, PortError>;

    async fn get_inscription(&self, id: InscriptionId) -> Result<Inscription, PortError>;

    /// Loads an inscription together with all its related entities
    async fn get_inscription_aggregate(
        &self,
        id: InscriptionId,
    ) -> Result<InscriptionAggregate, PortError>;

    /// Applies a partial update
    ///
    /// Lowering `matriculated` back to false is a validation error. Setting
    /// it to true when it already is true is a no-op reported through
    /// [`InscriptionTransition::newly_matriculated`].
    async fn update_inscription(
        &self,
        id: InscriptionId,
        update: InscriptionUpdate,
    ) -> Result<InscriptionTransition, PortError>;

    // --- Invoices ---

    /// Persists an invoice; conflicts on a duplicate invoice or entry number
    async fn insert_invoice(&self, invoice: Invoice) -> Result<Invoice, PortError>;

    async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, PortError>;

    /// Compare-and-swap payment verification
    ///
    /// Raises `payment_verified` on the invoice and `matriculated` on its
    /// inscription in one atomic step. Under concurrent calls exactly one
    /// caller observes `newly_verified == true`.
    async fn verify_invoice_payment(
        &self,
        id: InvoiceId,
    ) -> Result<PaymentVerification, PortError>;
}

/// Per-course integration mapping
///
/// Connects a catalog course to its counterpart on the external course
/// platform and, optionally, to a chat invite link. Courses without a
/// mapping simply skip the notification fan-out.
#[derive(Debug, Clone)]
pub struct CourseMapping {
    pub course_id: CourseId,
    /// Course identifier on the external platform
    pub external_course_id: String,
    /// Invite link for the course chat group, when one exists
    pub invite_link: Option<String>,
}

/// Lookup of integration mappings by course
#[async_trait]
pub trait CourseMappingPort: DomainPort {
    async fn mapping_for(&self, course_id: CourseId) -> Result<Option<CourseMapping>, PortError>;
}

/// External course platform
#[async_trait]
pub trait CoursePlatformPort: DomainPort {
    /// Enrolls a participant; returns the platform's user identifier
    async fn enroll(
        &self,
        external_course_id: &str,
        email: &str,
        full_name: &str,
    ) -> Result<String, PortError>;
}

/// Chat invite delivery
#[async_trait]
pub trait ChatInvitePort: DomainPort {
    async fn send_invite(&self, invite_link: &str, email: &str) -> Result<(), PortError>;
}

/// Receipt file storage backend
#[async_trait]
pub trait ReceiptStoragePort: DomainPort {
    async fn store(
        &self,
        content: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<StoredReceipt, PortError>;

    async fn delete(&self, path: &str) -> Result<(), PortError>;
}

/// In-memory adapters for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use std::collections::HashMap;

    use tokio::sync::RwLock;

    use super::*;

    #[derive(Default)]
    struct State {
        persons: HashMap<PersonId, Person>,
        billing: HashMap<BillingInfoId, BillingInfo>,
        receipts: HashMap<ReceiptId, Receipt>,
        courses: HashMap<CourseId, Course>,
        discounts: HashMap<DiscountId, Discount>,
        inscriptions: HashMap<InscriptionId, Inscription>,
        invoices: HashMap<InvoiceId, Invoice>,
    }

    /// In-memory [`EnrollmentStore`]
    ///
    /// A single `RwLock` over the whole state keeps the compare-and-swap
    /// operations atomic, mirroring what the SQL adapter does with
    /// conditional updates inside a transaction.
    #[derive(Default)]
    pub struct MockEnrollmentStore {
        state: RwLock<State>,
    }

    impl MockEnrollmentStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl State {
        fn receipt_is_bound(&self, receipt_id: ReceiptId) -> bool {
            self.inscriptions
                .values()
                .any(|i| i.receipt_id == receipt_id)
        }

        fn discount_is_referenced(&self, discount_id: DiscountId) -> bool {
            self.inscriptions
                .values()
                .any(|i| i.discount_id == Some(discount_id))
        }

        fn aggregate(&self, inscription: &Inscription) -> Result<InscriptionAggregate, PortError> {
            let person = self
                .persons
                .get(&inscription.person_id)
                .cloned()
                .ok_or_else(|| PortError::internal("Inscription references a missing person"))?;
            let course = self
                .courses
                .get(&inscription.course_id)
                .cloned()
                .ok_or_else(|| PortError::internal("Inscription references a missing course"))?;
            let billing = self
                .billing
                .get(&inscription.billing_id)
                .cloned()
                .ok_or_else(|| {
                    PortError::internal("Inscription references missing billing info")
                })?;
            let receipt = self
                .receipts
                .get(&inscription.receipt_id)
                .cloned()
                .ok_or_else(|| PortError::internal("Inscription references a missing receipt"))?;
            let discount = match inscription.discount_id {
                None => None,
                Some(id) => Some(self.discounts.get(&id).cloned().ok_or_else(|| {
                    PortError::internal("Inscription references a missing discount")
                })?),
            };

            Ok(InscriptionAggregate {
                inscription: inscription.clone(),
                person,
                course,
                billing,
                receipt,
                discount,
            })
        }
    }

    impl DomainPort for MockEnrollmentStore {}

    #[async_trait]
    impl EnrollmentStore for MockEnrollmentStore {
        async fn insert_person(&self, person: Person) -> Result<Person, PortError> {
            let mut state = self.state.write().await;
            let duplicate = state
                .persons
                .values()
                .any(|p| p.document.value() == person.document.value());
            if duplicate {
                return Err(PortError::conflict(format!(
                    "A person with document {} already exists",
                    person.document.value()
                )));
            }
            state.persons.insert(person.id, person.clone());
            Ok(person)
        }

        async fn get_person(&self, id: PersonId) -> Result<Person, PortError> {
            self.state
                .read()
                .await
                .persons
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Person", id))
        }

        async fn update_person_contact(
            &self,
            id: PersonId,
            update: UpdateContact,
        ) -> Result<Person, PortError> {
            let mut state = self.state.write().await;
            let person = state
                .persons
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Person", id))?;
            person.update_contact(update);
            Ok(person.clone())
        }

        async fn insert_billing_info(
            &self,
            billing: BillingInfo,
        ) -> Result<BillingInfo, PortError> {
            let mut state = self.state.write().await;
            state.billing.insert(billing.id, billing.clone());
            Ok(billing)
        }

        async fn get_billing_info(&self, id: BillingInfoId) -> Result<BillingInfo, PortError> {
            self.state
                .read()
                .await
                .billing
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("BillingInfo", id))
        }

        async fn insert_receipt(&self, receipt: Receipt) -> Result<Receipt, PortError> {
            let mut state = self.state.write().await;
            state.receipts.insert(receipt.id, receipt.clone());
            Ok(receipt)
        }

        async fn get_receipt(&self, id: ReceiptId) -> Result<Receipt, PortError> {
            self.state
                .read()
                .await
                .receipts
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Receipt", id))
        }

        async fn delete_receipt(&self, id: ReceiptId) -> Result<(), PortError> {
            let mut state = self.state.write().await;
            if !state.receipts.contains_key(&id) {
                return Err(PortError::not_found("Receipt", id));
            }
            if state.receipt_is_bound(id) {
                return Err(PortError::conflict(format!(
                    "Receipt {id} is bound to an inscription"
                )));
            }
            state.receipts.remove(&id);
            Ok(())
        }

        async fn insert_course(&self, course: Course) -> Result<Course, PortError> {
            let mut state = self.state.write().await;
            state.courses.insert(course.id, course.clone());
            Ok(course)
        }

        async fn get_course(&self, id: CourseId) -> Result<Course, PortError> {
            self.state
                .read()
                .await
                .courses
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Course", id))
        }

        async fn list_courses(&self) -> Result<Vec<Course>, PortError> {
            let state = self.state.read().await;
            let mut courses: Vec<Course> = state.courses.values().cloned().collect();
            courses.sort_by(|a, b| a.schedule.start().cmp(&b.schedule.start()));
            Ok(courses)
        }

        async fn insert_discount(&self, discount: Discount) -> Result<Discount, PortError> {
            let mut state = self.state.write().await;
            state.discounts.insert(discount.id, discount.clone());
            Ok(discount)
        }

        async fn get_discount(&self, id: DiscountId) -> Result<Discount, PortError> {
            self.state
                .read()
                .await
                .discounts
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Discount", id))
        }

        async fn delete_discount(&self, id: DiscountId) -> Result<(), PortError> {
            let mut state = self.state.write().await;
            if !state.discounts.contains_key(&id) {
                return Err(PortError::not_found("Discount", id));
            }
            if state.discount_is_referenced(id) {
                return Err(PortError::conflict(format!(
                    "Discount {id} is referenced by an inscription"
                )));
            }
            state.discounts.remove(&id);
            Ok(())
        }

        async fn insert_inscription(
            &self,
            inscription: Inscription,
        ) -> Result<Inscription, PortError> {
            let mut state = self.state.write().await;
            if state.receipt_is_bound(inscription.receipt_id) {
                return Err(PortError::conflict(format!(
                    "Receipt {} is already bound to an inscription",
                    inscription.receipt_id
                )));
            }
            let duplicate_pair = state.inscriptions.values().any(|i| {
                i.person_id == inscription.person_id && i.course_id == inscription.course_id
            });
            if duplicate_pair {
                return Err(PortError::conflict(
                    "Person is already inscribed in this course",
                ));
            }
            state
                .inscriptions
                .insert(inscription.id, inscription.clone());
            Ok(inscription)
        }

        async fn get_inscription(&self, id: InscriptionId) -> Result<Inscription, PortError> {
            self.state
                .read()
                .await
                .inscriptions
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Inscription", id))
        }

        async fn get_inscription_aggregate(
            &self,
            id: InscriptionId,
        ) -> Result<InscriptionAggregate, PortError> {
            let state = self.state.read().await;
            let inscription = state
                .inscriptions
                .get(&id)
                .ok_or_else(|| PortError::not_found("Inscription", id))?;
            state.aggregate(inscription)
        }

        async fn update_inscription(
            &self,
            id: InscriptionId,
            update: InscriptionUpdate,
        ) -> Result<InscriptionTransition, PortError> {
            let mut state = self.state.write().await;
            let inscription = state
                .inscriptions
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Inscription", id))?;

            if let Some(discount_id) = update.discount_id {
                inscription.discount_id = Some(discount_id);
            }
            let newly_matriculated = match update.matriculated {
                Some(true) => inscription.matriculate(),
                Some(false) if inscription.matriculated => {
                    return Err(PortError::validation_field(
                        "Matriculation cannot be revoked",
                        "matriculated",
                    ));
                }
                _ => false,
            };

            Ok(InscriptionTransition {
                inscription: inscription.clone(),
                newly_matriculated,
            })
        }

        async fn insert_invoice(&self, invoice: Invoice) -> Result<Invoice, PortError> {
            let mut state = self.state.write().await;
            if !state.inscriptions.contains_key(&invoice.inscription_id) {
                return Err(PortError::not_found("Inscription", invoice.inscription_id));
            }
            for existing in state.invoices.values() {
                if existing.invoice_number == invoice.invoice_number {
                    return Err(PortError::conflict(format!(
                        "Invoice number {} already exists",
                        invoice.invoice_number
                    )));
                }
                if existing.entry_number == invoice.entry_number {
                    return Err(PortError::conflict(format!(
                        "Entry number {} already exists",
                        invoice.entry_number
                    )));
                }
            }
            state.invoices.insert(invoice.id, invoice.clone());
            Ok(invoice)
        }

        async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, PortError> {
            self.state
                .read()
                .await
                .invoices
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Invoice", id))
        }

        async fn verify_invoice_payment(
            &self,
            id: InvoiceId,
        ) -> Result<PaymentVerification, PortError> {
            let mut state = self.state.write().await;
            let invoice = state
                .invoices
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Invoice", id))?;
            let newly_verified = invoice.verify();
            let invoice = invoice.clone();

            let newly_matriculated = if newly_verified {
                let inscription = state
                    .inscriptions
                    .get_mut(&invoice.inscription_id)
                    .ok_or_else(|| {
                        PortError::internal("Invoice references a missing inscription")
                    })?;
                inscription.matriculate()
            } else {
                false
            };

            Ok(PaymentVerification {
                invoice,
                newly_verified,
                newly_matriculated,
            })
        }
    }

    /// In-memory [`CourseMappingPort`] backed by a fixed table
    #[derive(Default)]
    pub struct MockCourseMappings {
        mappings: HashMap<CourseId, CourseMapping>,
    }

    impl MockCourseMappings {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_mapping(mut self, mapping: CourseMapping) -> Self {
            self.mappings.insert(mapping.course_id, mapping);
            self
        }
    }

    impl DomainPort for MockCourseMappings {}

    #[async_trait]
    impl CourseMappingPort for MockCourseMappings {
        async fn mapping_for(
            &self,
            course_id: CourseId,
        ) -> Result<Option<CourseMapping>, PortError> {
            Ok(self.mappings.get(&course_id).cloned())
        }
    }

    /// In-memory [`ReceiptStoragePort`]
    #[derive(Default)]
    pub struct MockReceiptStorage {
        files: RwLock<HashMap<String, Vec<u8>>>,
        fail_deletes: std::sync::atomic::AtomicBool,
    }

    impl MockReceiptStorage {
        pub fn new() -> Self {
            Self::default()
        }

        /// A storage double whose `delete` always fails
        pub fn with_failing_deletes() -> Self {
            let storage = Self::default();
            storage
                .fail_deletes
                .store(true, std::sync::atomic::Ordering::SeqCst);
            storage
        }

        pub async fn contains(&self, path: &str) -> bool {
            self.files.read().await.contains_key(path)
        }
    }

    impl DomainPort for MockReceiptStorage {}

    #[async_trait]
    impl ReceiptStoragePort for MockReceiptStorage {
        async fn store(
            &self,
            content: Vec<u8>,
            filename: &str,
            mime_type: &str,
        ) -> Result<StoredReceipt, PortError> {
            let path = format!("receipts/{}/{filename}", uuid::Uuid::new_v4());
            self.files.write().await.insert(path.clone(), content);
            Ok(StoredReceipt {
                path,
                mime_type: mime_type.to_string(),
                filename: filename.to_string(),
            })
        }

        async fn delete(&self, path: &str) -> Result<(), PortError> {
            if self.fail_deletes.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(PortError::internal("disk error"));
            }
            self.files
                .write()
                .await
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("ReceiptFile", path))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;
        use domain_catalog::{CourseModality, NewCourse};
        use domain_party::{IdentityDocument, NewPerson};
        use rust_decimal_macros::dec;

        use crate::inscription::NewInscription;
        use crate::invoice::NewInvoice;
        use core_kernel::Money;

        fn person(document: &str) -> Person {
            Person::new(
                IdentityDocument::validate(document).unwrap(),
                NewPerson {
                    document: document.to_string(),
                    first_name: "Ana".to_string(),
                    last_name: "Paredes".to_string(),
                    email: "ana@example.com".to_string(),
                    phone: None,
                    locale: None,
                },
            )
        }

        fn course() -> Course {
            Course::new(
                NewCourse {
                    short_name: "RUST-101".to_string(),
                    long_name: "Introduction to Rust".to_string(),
                    modality: CourseModality::Online,
                    price: Money::new(dec!(200.00)),
                    payment_link: None,
                    start_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
                    end_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
                },
                NaiveDate::from_ymd_opt(2026, 8, 26).unwrap(),
            )
            .unwrap()
        }

        fn receipt() -> Receipt {
            Receipt::from_stored(StoredReceipt {
                path: "receipts/r1.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                filename: "r1.pdf".to_string(),
            })
        }

        fn billing() -> BillingInfo {
            BillingInfo::new(domain_party::NewBillingInfo {
                legal_name: "Ana Paredes".to_string(),
                tax_id: "0402084040001".to_string(),
                phone: None,
                email: "ana@example.com".to_string(),
                address: Some("Quito".to_string()),
            })
        }

        async fn seeded_inscription(store: &MockEnrollmentStore) -> Inscription {
            let p = store.insert_person(person("0402084040")).await.unwrap();
            let c = store.insert_course(course()).await.unwrap();
            let b = store.insert_billing_info(billing()).await.unwrap();
            let r = store.insert_receipt(receipt()).await.unwrap();
            store
                .insert_inscription(Inscription::new(NewInscription {
                    course_id: c.id,
                    person_id: p.id,
                    billing_id: b.id,
                    receipt_id: r.id,
                    discount_id: None,
                }))
                .await
                .unwrap()
        }

        #[tokio::test]
        async fn test_duplicate_document_conflicts() {
            let store = MockEnrollmentStore::new();
            store.insert_person(person("0402084040")).await.unwrap();
            let err = store.insert_person(person("0402084040")).await.unwrap_err();
            assert!(err.is_conflict());
        }

        #[tokio::test]
        async fn test_receipt_binds_to_one_inscription() {
            let store = MockEnrollmentStore::new();
            let inscription = seeded_inscription(&store).await;

            let other_person = store.insert_person(person("1710034065")).await.unwrap();
            let other_course = store.insert_course(course()).await.unwrap();
            let err = store
                .insert_inscription(Inscription::new(NewInscription {
                    course_id: other_course.id,
                    person_id: other_person.id,
                    billing_id: inscription.billing_id,
                    receipt_id: inscription.receipt_id,
                    discount_id: None,
                }))
                .await
                .unwrap_err();
            assert!(err.is_conflict());
        }

        #[tokio::test]
        async fn test_person_cannot_inscribe_twice_in_same_course() {
            let store = MockEnrollmentStore::new();
            let inscription = seeded_inscription(&store).await;

            let second_receipt = store.insert_receipt(receipt()).await.unwrap();
            let err = store
                .insert_inscription(Inscription::new(NewInscription {
                    course_id: inscription.course_id,
                    person_id: inscription.person_id,
                    billing_id: inscription.billing_id,
                    receipt_id: second_receipt.id,
                    discount_id: None,
                }))
                .await
                .unwrap_err();
            assert!(err.is_conflict());
        }

        #[tokio::test]
        async fn test_matriculation_cannot_be_revoked() {
            let store = MockEnrollmentStore::new();
            let inscription = seeded_inscription(&store).await;

            let transition = store
                .update_inscription(
                    inscription.id,
                    InscriptionUpdate {
                        matriculated: Some(true),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            assert!(transition.newly_matriculated);

            let err = store
                .update_inscription(
                    inscription.id,
                    InscriptionUpdate {
                        matriculated: Some(false),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, PortError::Validation { .. }));
        }

        #[tokio::test]
        async fn test_verify_invoice_payment_is_idempotent() {
            let store = MockEnrollmentStore::new();
            let inscription = seeded_inscription(&store).await;
            let invoice = store
                .insert_invoice(
                    Invoice::new(NewInvoice {
                        inscription_id: inscription.id,
                        billing_id: inscription.billing_id,
                        amount_paid: dec!(200.00),
                        entry_number: "ING-1".to_string(),
                        invoice_number: "FAC-1".to_string(),
                    })
                    .unwrap(),
                )
                .await
                .unwrap();

            let first = store.verify_invoice_payment(invoice.id).await.unwrap();
            assert!(first.newly_verified);
            assert!(first.newly_matriculated);

            let second = store.verify_invoice_payment(invoice.id).await.unwrap();
            assert!(!second.newly_verified);
            assert!(!second.newly_matriculated);

            let stored = store.get_inscription(inscription.id).await.unwrap();
            assert!(stored.matriculated);
        }

        #[tokio::test]
        async fn test_duplicate_invoice_number_conflicts() {
            let store = MockEnrollmentStore::new();
            let inscription = seeded_inscription(&store).await;

            let make = |entry: &str, number: &str| {
                Invoice::new(NewInvoice {
                    inscription_id: inscription.id,
                    billing_id: inscription.billing_id,
                    amount_paid: dec!(200.00),
                    entry_number: entry.to_string(),
                    invoice_number: number.to_string(),
                })
                .unwrap()
            };

            store.insert_invoice(make("ING-1", "FAC-1")).await.unwrap();
            let err = store
                .insert_invoice(make("ING-2", "FAC-1"))
                .await
                .unwrap_err();
            assert!(err.is_conflict());
            let err = store
                .insert_invoice(make("ING-1", "FAC-2"))
                .await
                .unwrap_err();
            assert!(err.is_conflict());
        }

        #[tokio::test]
        async fn test_delete_bound_receipt_conflicts() {
            let store = MockEnrollmentStore::new();
            let inscription = seeded_inscription(&store).await;
            let err = store.delete_receipt(inscription.receipt_id).await.unwrap_err();
            assert!(err.is_conflict());

            let unbound = store.insert_receipt(receipt()).await.unwrap();
            assert!(store.delete_receipt(unbound.id).await.is_ok());
        }
    }
}
