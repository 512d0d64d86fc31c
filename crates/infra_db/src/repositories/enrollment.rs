//! PostgreSQL enrollment store
//!
//! Implements the domain's persistence port on PostgreSQL. Uniqueness rules
//! live in the schema (unique indexes on person documents, receipt bindings,
//! person+course pairs and invoice numbers) and surface as conflicts; the
//! two flag transitions are conditional updates so concurrent verifiers
//! race on the database row, not in application code.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{
    BillingInfoId, CourseId, DateRange, DiscountId, DomainPort, InscriptionId, InvoiceId, Money,
    PersonId, PortError, ReceiptId,
};
use domain_catalog::{Course, CourseModality, Discount, DiscountKind};
use domain_enrollment::{
    CourseMapping, CourseMappingPort, EnrollmentStore, Inscription, InscriptionAggregate,
    InscriptionTransition, InscriptionUpdate, Invoice, PaymentVerification, Receipt,
};
use domain_party::{BillingInfo, IdentityDocument, Person, UpdateContact};

use crate::error::DatabaseError;

/// PostgreSQL implementation of the enrollment persistence port
#[derive(Debug, Clone)]
pub struct PostgresEnrollmentStore {
    pool: PgPool,
}

impl PostgresEnrollmentStore {
    /// Creates a new store backed by the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// --- Row types ---

#[derive(sqlx::FromRow)]
struct PersonRow {
    id: Uuid,
    document_kind: String,
    document_value: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    locale: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PersonRow> for Person {
    type Error = DatabaseError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        let document = IdentityDocument::from_parts(&row.document_kind, &row.document_value)
            .map_err(|_| {
                DatabaseError::CorruptRow(format!(
                    "Unknown document kind '{}' for person {}",
                    row.document_kind, row.id
                ))
            })?;
        Ok(Person {
            id: PersonId::from_uuid(row.id),
            document,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            locale: row.locale,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BillingRow {
    id: Uuid,
    legal_name: String,
    tax_id: String,
    phone: Option<String>,
    email: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BillingRow> for BillingInfo {
    fn from(row: BillingRow) -> Self {
        BillingInfo {
            id: BillingInfoId::from_uuid(row.id),
            legal_name: row.legal_name,
            tax_id: row.tax_id,
            phone: row.phone,
            email: row.email,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReceiptRow {
    id: Uuid,
    storage_path: String,
    mime_type: String,
    original_filename: String,
    uploaded_at: DateTime<Utc>,
}

impl From<ReceiptRow> for Receipt {
    fn from(row: ReceiptRow) -> Self {
        Receipt {
            id: ReceiptId::from_uuid(row.id),
            storage_path: row.storage_path,
            mime_type: row.mime_type,
            original_filename: row.original_filename,
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    short_name: String,
    long_name: String,
    modality: String,
    price: Decimal,
    payment_link: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl TryFrom<CourseRow> for Course {
    type Error = DatabaseError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let schedule = DateRange::new(row.start_date, row.end_date).map_err(|e| {
            DatabaseError::CorruptRow(format!("Course {} schedule: {}", row.id, e))
        })?;
        Ok(Course {
            id: CourseId::from_uuid(row.id),
            short_name: row.short_name,
            long_name: row.long_name,
            modality: modality_from_str(&row.modality)
                .ok_or_else(|| {
                    DatabaseError::CorruptRow(format!(
                        "Unknown modality '{}' for course {}",
                        row.modality, row.id
                    ))
                })?,
            price: Money::new(row.price),
            payment_link: row.payment_link,
            schedule,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct DiscountRow {
    id: Uuid,
    kind: String,
    amount_off: Decimal,
    percent_off: Option<Decimal>,
    description: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<DiscountRow> for Discount {
    type Error = DatabaseError;

    fn try_from(row: DiscountRow) -> Result<Self, Self::Error> {
        Ok(Discount {
            id: DiscountId::from_uuid(row.id),
            kind: discount_kind_from_str(&row.kind).ok_or_else(|| {
                DatabaseError::CorruptRow(format!(
                    "Unknown discount kind '{}' for discount {}",
                    row.kind, row.id
                ))
            })?,
            amount_off: Money::new(row.amount_off),
            percent_off: row.percent_off,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct InscriptionRow {
    id: Uuid,
    course_id: Uuid,
    person_id: Uuid,
    billing_id: Uuid,
    receipt_id: Uuid,
    discount_id: Option<Uuid>,
    matriculated: bool,
    enrolled_at: DateTime<Utc>,
}

impl From<InscriptionRow> for Inscription {
    fn from(row: InscriptionRow) -> Self {
        Inscription {
            id: InscriptionId::from_uuid(row.id),
            course_id: CourseId::from_uuid(row.course_id),
            person_id: PersonId::from_uuid(row.person_id),
            billing_id: BillingInfoId::from_uuid(row.billing_id),
            receipt_id: ReceiptId::from_uuid(row.receipt_id),
            discount_id: row.discount_id.map(DiscountId::from_uuid),
            matriculated: row.matriculated,
            enrolled_at: row.enrolled_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    inscription_id: Uuid,
    billing_id: Uuid,
    amount_paid: Decimal,
    entry_number: String,
    invoice_number: String,
    payment_verified: bool,
    created_at: DateTime<Utc>,
    verified_at: Option<DateTime<Utc>>,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Invoice {
            id: InvoiceId::from_uuid(row.id),
            inscription_id: InscriptionId::from_uuid(row.inscription_id),
            billing_id: BillingInfoId::from_uuid(row.billing_id),
            amount_paid: Money::new(row.amount_paid),
            entry_number: row.entry_number,
            invoice_number: row.invoice_number,
            payment_verified: row.payment_verified,
            created_at: row.created_at,
            verified_at: row.verified_at,
        }
    }
}

fn modality_to_str(modality: CourseModality) -> &'static str {
    match modality {
        CourseModality::InPerson => "in_person",
        CourseModality::Online => "online",
        CourseModality::Hybrid => "hybrid",
    }
}

fn modality_from_str(s: &str) -> Option<CourseModality> {
    match s {
        "in_person" => Some(CourseModality::InPerson),
        "online" => Some(CourseModality::Online),
        "hybrid" => Some(CourseModality::Hybrid),
        _ => None,
    }
}

fn discount_kind_to_str(kind: DiscountKind) -> &'static str {
    match kind {
        DiscountKind::EarlyBird => "early_bird",
        DiscountKind::Group => "group",
        DiscountKind::Scholarship => "scholarship",
        DiscountKind::Promotional => "promotional",
        DiscountKind::Other => "other",
    }
}

fn discount_kind_from_str(s: &str) -> Option<DiscountKind> {
    match s {
        "early_bird" => Some(DiscountKind::EarlyBird),
        "group" => Some(DiscountKind::Group),
        "scholarship" => Some(DiscountKind::Scholarship),
        "promotional" => Some(DiscountKind::Promotional),
        "other" => Some(DiscountKind::Other),
        _ => None,
    }
}

const PERSON_COLUMNS: &str = "id, document_kind, document_value, first_name, last_name, email, phone, locale, created_at, updated_at";
const BILLING_COLUMNS: &str = "id, legal_name, tax_id, phone, email, address, created_at";
const RECEIPT_COLUMNS: &str = "id, storage_path, mime_type, original_filename, uploaded_at";
const COURSE_COLUMNS: &str =
    "id, short_name, long_name, modality, price, payment_link, start_date, end_date, created_at";
const DISCOUNT_COLUMNS: &str = "id, kind, amount_off, percent_off, description, created_at";
const INSCRIPTION_COLUMNS: &str =
    "id, course_id, person_id, billing_id, receipt_id, discount_id, matriculated, enrolled_at";
const INVOICE_COLUMNS: &str = "id, inscription_id, billing_id, amount_paid, entry_number, invoice_number, payment_verified, created_at, verified_at";

impl DomainPort for PostgresEnrollmentStore {}

#[async_trait]
impl EnrollmentStore for PostgresEnrollmentStore {
    async fn insert_person(&self, person: Person) -> Result<Person, PortError> {
        let result = sqlx::query(
            r#"
            INSERT INTO persons (
                id, document_kind, document_value, first_name, last_name,
                email, phone, locale, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(person.id.as_uuid())
        .bind(person.document.kind())
        .bind(person.document.value())
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.email)
        .bind(&person.phone)
        .bind(&person.locale)
        .bind(person.created_at)
        .bind(person.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from);

        match result {
            Ok(_) => Ok(person),
            Err(DatabaseError::DuplicateEntry(_)) => Err(PortError::conflict(format!(
                "A person with document {} already exists",
                person.document.value()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_person(&self, id: PersonId) -> Result<Person, PortError> {
        let row = sqlx::query_as::<_, PersonRow>(&format!(
            "SELECT {PERSON_COLUMNS} FROM persons WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| PortError::not_found("Person", id))?;
        Ok(Person::try_from(row)?)
    }

    async fn update_person_contact(
        &self,
        id: PersonId,
        update: UpdateContact,
    ) -> Result<Person, PortError> {
        let row = sqlx::query_as::<_, PersonRow>(&format!(
            r#"
            UPDATE persons SET
                email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                locale = COALESCE($4, locale),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PERSON_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.locale)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| PortError::not_found("Person", id))?;
        Ok(Person::try_from(row)?)
    }

    async fn insert_billing_info(&self, billing: BillingInfo) -> Result<BillingInfo, PortError> {
        sqlx::query(
            r#"
            INSERT INTO billing_info (id, legal_name, tax_id, phone, email, address, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(billing.id.as_uuid())
        .bind(&billing.legal_name)
        .bind(&billing.tax_id)
        .bind(&billing.phone)
        .bind(&billing.email)
        .bind(&billing.address)
        .bind(billing.created_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(billing)
    }

    async fn get_billing_info(&self, id: BillingInfoId) -> Result<BillingInfo, PortError> {
        let row = sqlx::query_as::<_, BillingRow>(&format!(
            "SELECT {BILLING_COLUMNS} FROM billing_info WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| PortError::not_found("BillingInfo", id))?;
        Ok(row.into())
    }

    async fn insert_receipt(&self, receipt: Receipt) -> Result<Receipt, PortError> {
        sqlx::query(
            r#"
            INSERT INTO receipts (id, storage_path, mime_type, original_filename, uploaded_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(receipt.id.as_uuid())
        .bind(&receipt.storage_path)
        .bind(&receipt.mime_type)
        .bind(&receipt.original_filename)
        .bind(receipt.uploaded_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(receipt)
    }

    async fn get_receipt(&self, id: ReceiptId) -> Result<Receipt, PortError> {
        let row = sqlx::query_as::<_, ReceiptRow>(&format!(
            "SELECT {RECEIPT_COLUMNS} FROM receipts WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| PortError::not_found("Receipt", id))?;
        Ok(row.into())
    }

    async fn delete_receipt(&self, id: ReceiptId) -> Result<(), PortError> {
        let result = sqlx::query("DELETE FROM receipts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from);

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(PortError::not_found("Receipt", id)),
            Ok(_) => Ok(()),
            Err(DatabaseError::ForeignKeyViolation(_)) => Err(PortError::conflict(format!(
                "Receipt {id} is bound to an inscription"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_course(&self, course: Course) -> Result<Course, PortError> {
        sqlx::query(
            r#"
            INSERT INTO courses (
                id, short_name, long_name, modality, price,
                payment_link, start_date, end_date, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(&course.short_name)
        .bind(&course.long_name)
        .bind(modality_to_str(course.modality))
        .bind(course.price.amount())
        .bind(&course.payment_link)
        .bind(course.schedule.start())
        .bind(course.schedule.end())
        .bind(course.created_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(course)
    }

    async fn get_course(&self, id: CourseId) -> Result<Course, PortError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| PortError::not_found("Course", id))?;
        Ok(Course::try_from(row)?)
    }

    async fn list_courses(&self) -> Result<Vec<Course>, PortError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY start_date"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        rows.into_iter()
            .map(|row| Course::try_from(row).map_err(PortError::from))
            .collect()
    }

    async fn insert_discount(&self, discount: Discount) -> Result<Discount, PortError> {
        sqlx::query(
            r#"
            INSERT INTO discounts (id, kind, amount_off, percent_off, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(discount.id.as_uuid())
        .bind(discount_kind_to_str(discount.kind))
        .bind(discount.amount_off.amount())
        .bind(discount.percent_off)
        .bind(&discount.description)
        .bind(discount.created_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(discount)
    }

    async fn get_discount(&self, id: DiscountId) -> Result<Discount, PortError> {
        let row = sqlx::query_as::<_, DiscountRow>(&format!(
            "SELECT {DISCOUNT_COLUMNS} FROM discounts WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| PortError::not_found("Discount", id))?;
        Ok(Discount::try_from(row)?)
    }

    async fn delete_discount(&self, id: DiscountId) -> Result<(), PortError> {
        let result = sqlx::query("DELETE FROM discounts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from);

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(PortError::not_found("Discount", id)),
            Ok(_) => Ok(()),
            Err(DatabaseError::ForeignKeyViolation(_)) => Err(PortError::conflict(format!(
                "Discount {id} is referenced by an inscription"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_inscription(
        &self,
        inscription: Inscription,
    ) -> Result<Inscription, PortError> {
        let result = sqlx::query(
            r#"
            INSERT INTO inscriptions (
                id, course_id, person_id, billing_id, receipt_id,
                discount_id, matriculated, enrolled_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(inscription.id.as_uuid())
        .bind(inscription.course_id.as_uuid())
        .bind(inscription.person_id.as_uuid())
        .bind(inscription.billing_id.as_uuid())
        .bind(inscription.receipt_id.as_uuid())
        .bind(inscription.discount_id.map(|d| *d.as_uuid()))
        .bind(inscription.matriculated)
        .bind(inscription.enrolled_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from);

        match result {
            Ok(_) => Ok(inscription),
            Err(DatabaseError::DuplicateEntry(msg)) => {
                if msg.contains("receipt") {
                    Err(PortError::conflict(format!(
                        "Receipt {} is already bound to an inscription",
                        inscription.receipt_id
                    )))
                } else {
                    Err(PortError::conflict(
                        "Person is already inscribed in this course",
                    ))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_inscription(&self, id: InscriptionId) -> Result<Inscription, PortError> {
        let row = sqlx::query_as::<_, InscriptionRow>(&format!(
            "SELECT {INSCRIPTION_COLUMNS} FROM inscriptions WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| PortError::not_found("Inscription", id))?;
        Ok(row.into())
    }

    async fn get_inscription_aggregate(
        &self,
        id: InscriptionId,
    ) -> Result<InscriptionAggregate, PortError> {
        let inscription = self.get_inscription(id).await?;
        let person = self.get_person(inscription.person_id).await?;
        let course = self.get_course(inscription.course_id).await?;
        let billing = self.get_billing_info(inscription.billing_id).await?;
        let receipt = self.get_receipt(inscription.receipt_id).await?;
        let discount = match inscription.discount_id {
            None => None,
            Some(discount_id) => Some(self.get_discount(discount_id).await?),
        };

        Ok(InscriptionAggregate {
            inscription,
            person,
            course,
            billing,
            receipt,
            discount,
        })
    }

    async fn update_inscription(
        &self,
        id: InscriptionId,
        update: InscriptionUpdate,
    ) -> Result<InscriptionTransition, PortError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let current = sqlx::query_as::<_, InscriptionRow>(&format!(
            "SELECT {INSCRIPTION_COLUMNS} FROM inscriptions WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| PortError::not_found("Inscription", id))?;

        if update.matriculated == Some(false) && current.matriculated {
            return Err(PortError::validation_field(
                "Matriculation cannot be revoked",
                "matriculated",
            ));
        }

        let raise = update.matriculated == Some(true);
        let row = sqlx::query_as::<_, InscriptionRow>(&format!(
            r#"
            UPDATE inscriptions SET
                discount_id = COALESCE($2, discount_id),
                matriculated = matriculated OR $3
            WHERE id = $1
            RETURNING {INSCRIPTION_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(update.discount_id.map(|d| *d.as_uuid()))
        .bind(raise)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        tx.commit().await.map_err(DatabaseError::from)?;

        let newly_matriculated = !current.matriculated && row.matriculated;
        Ok(InscriptionTransition {
            inscription: row.into(),
            newly_matriculated,
        })
    }

    async fn insert_invoice(&self, invoice: Invoice) -> Result<Invoice, PortError> {
        let result = sqlx::query(
            r#"
            INSERT INTO invoices (
                id, inscription_id, billing_id, amount_paid, entry_number,
                invoice_number, payment_verified, created_at, verified_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(invoice.id.as_uuid())
        .bind(invoice.inscription_id.as_uuid())
        .bind(invoice.billing_id.as_uuid())
        .bind(invoice.amount_paid.amount())
        .bind(&invoice.entry_number)
        .bind(&invoice.invoice_number)
        .bind(invoice.payment_verified)
        .bind(invoice.created_at)
        .bind(invoice.verified_at)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from);

        match result {
            Ok(_) => Ok(invoice),
            Err(DatabaseError::DuplicateEntry(msg)) => {
                if msg.contains("entry_number") {
                    Err(PortError::conflict(format!(
                        "Entry number {} already exists",
                        invoice.entry_number
                    )))
                } else {
                    Err(PortError::conflict(format!(
                        "Invoice number {} already exists",
                        invoice.invoice_number
                    )))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, PortError> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| PortError::not_found("Invoice", id))?;
        Ok(row.into())
    }

    async fn verify_invoice_payment(
        &self,
        id: InvoiceId,
    ) -> Result<PaymentVerification, PortError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        // Conditional update: only one concurrent caller wins this
        let verified = sqlx::query_as::<_, InvoiceRow>(&format!(
            r#"
            UPDATE invoices
            SET payment_verified = TRUE, verified_at = NOW()
            WHERE id = $1 AND payment_verified = FALSE
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        let verification = match verified {
            Some(row) => {
                let matriculated = sqlx::query(
                    r#"
                    UPDATE inscriptions
                    SET matriculated = TRUE
                    WHERE id = $1 AND matriculated = FALSE
                    "#,
                )
                .bind(row.inscription_id)
                .execute(&mut *tx)
                .await
                .map_err(DatabaseError::from)?;

                PaymentVerification {
                    invoice: row.into(),
                    newly_verified: true,
                    newly_matriculated: matriculated.rows_affected() > 0,
                }
            }
            None => {
                // Already verified, or missing entirely
                let row = sqlx::query_as::<_, InvoiceRow>(&format!(
                    "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
                ))
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(DatabaseError::from)?
                .ok_or_else(|| PortError::not_found("Invoice", id))?;

                PaymentVerification {
                    invoice: row.into(),
                    newly_verified: false,
                    newly_matriculated: false,
                }
            }
        };

        tx.commit().await.map_err(DatabaseError::from)?;
        Ok(verification)
    }
}

/// PostgreSQL implementation of the course mapping lookup
#[derive(Debug, Clone)]
pub struct PostgresCourseMappings {
    pool: PgPool,
}

impl PostgresCourseMappings {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CourseMappingRow {
    course_id: Uuid,
    external_course_id: String,
    invite_link: Option<String>,
}

impl DomainPort for PostgresCourseMappings {}

#[async_trait]
impl CourseMappingPort for PostgresCourseMappings {
    async fn mapping_for(&self, course_id: CourseId) -> Result<Option<CourseMapping>, PortError> {
        let row = sqlx::query_as::<_, CourseMappingRow>(
            "SELECT course_id, external_course_id, invite_link FROM course_mappings WHERE course_id = $1",
        )
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(row.map(|r| CourseMapping {
            course_id: CourseId::from_uuid(r.course_id),
            external_course_id: r.external_course_id,
            invite_link: r.invite_link,
        }))
    }
}
