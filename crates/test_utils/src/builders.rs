//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the fields they care about and take defaults for
//! everything else.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{BillingInfoId, InscriptionId, Money};
use domain_catalog::{CourseModality, NewCourse};
use domain_enrollment::NewInvoice;
use domain_party::{NewBillingInfo, NewPerson};

use crate::fixtures::{DocumentFixtures, MoneyFixtures, StringFixtures, TemporalFixtures};

/// Builder for person-creation requests
pub struct TestPersonBuilder {
    document: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    locale: Option<String>,
}

impl Default for TestPersonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPersonBuilder {
    /// Creates a builder with a valid document and contact data
    pub fn new() -> Self {
        Self {
            document: DocumentFixtures::valid_national_id().to_string(),
            first_name: "Maria".to_string(),
            last_name: "Quinde".to_string(),
            email: StringFixtures::email().to_string(),
            phone: None,
            locale: Some("es-EC".to_string()),
        }
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = document.into();
        self
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn build(self) -> NewPerson {
        NewPerson {
            document: self.document,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            locale: self.locale,
        }
    }
}

/// Builder for course-creation requests
pub struct TestCourseBuilder {
    short_name: String,
    long_name: String,
    modality: CourseModality,
    price: Money,
    payment_link: Option<String>,
}

impl Default for TestCourseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCourseBuilder {
    pub fn new() -> Self {
        Self {
            short_name: "RUST-101".to_string(),
            long_name: "Introduction to Rust".to_string(),
            modality: CourseModality::Online,
            price: MoneyFixtures::course_price(),
            payment_link: None,
        }
    }

    pub fn with_short_name(mut self, name: impl Into<String>) -> Self {
        self.short_name = name.into();
        self
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = price;
        self
    }

    pub fn with_modality(mut self, modality: CourseModality) -> Self {
        self.modality = modality;
        self
    }

    pub fn build(self) -> NewCourse {
        NewCourse {
            short_name: self.short_name,
            long_name: self.long_name,
            modality: self.modality,
            price: self.price,
            payment_link: self.payment_link,
            start_date: TemporalFixtures::course_start(),
            end_date: TemporalFixtures::course_end(),
        }
    }
}

/// Builder for billing-information requests
pub struct TestBillingBuilder {
    legal_name: String,
    tax_id: String,
    email: String,
    address: Option<String>,
}

impl Default for TestBillingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBillingBuilder {
    pub fn new() -> Self {
        Self {
            legal_name: "Maria Quinde".to_string(),
            tax_id: StringFixtures::tax_id().to_string(),
            email: StringFixtures::email().to_string(),
            address: Some("Quito".to_string()),
        }
    }

    pub fn with_legal_name(mut self, name: impl Into<String>) -> Self {
        self.legal_name = name.into();
        self
    }

    pub fn with_tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = tax_id.into();
        self
    }

    pub fn build(self) -> NewBillingInfo {
        NewBillingInfo {
            legal_name: self.legal_name,
            tax_id: self.tax_id,
            phone: None,
            email: self.email,
            address: self.address,
        }
    }
}

/// Builder for invoice-creation requests
pub struct TestInvoiceBuilder {
    inscription_id: InscriptionId,
    billing_id: BillingInfoId,
    amount_paid: Decimal,
    entry_number: String,
    invoice_number: String,
}

impl TestInvoiceBuilder {
    /// Creates a builder bound to the given inscription and billing record
    pub fn new(inscription_id: InscriptionId, billing_id: BillingInfoId) -> Self {
        Self {
            inscription_id,
            billing_id,
            amount_paid: dec!(350.00),
            entry_number: StringFixtures::entry_number().to_string(),
            invoice_number: StringFixtures::invoice_number().to_string(),
        }
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount_paid = amount;
        self
    }

    pub fn with_numbers(mut self, entry: impl Into<String>, invoice: impl Into<String>) -> Self {
        self.entry_number = entry.into();
        self.invoice_number = invoice.into();
        self
    }

    pub fn build(self) -> NewInvoice {
        NewInvoice {
            inscription_id: self.inscription_id,
            billing_id: self.billing_id,
            amount_paid: self.amount_paid,
            entry_number: self.entry_number,
            invoice_number: self.invoice_number,
        }
    }
}
