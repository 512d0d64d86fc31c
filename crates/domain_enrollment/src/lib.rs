//! Enrollment Domain - the paid-course enrollment core
//!
//! This crate owns the inscription lifecycle:
//! - `inscription`: the aggregate tying person, course, billing and receipt
//! - `receipt`: payment receipt metadata
//! - `invoice`: invoices and the payment-verified flag
//! - `ports`: persistence and integration ports (with in-memory mocks)
//! - `adapters`: HTTP clients for the course platform and chat gateway
//! - `notifier`: the matriculation fan-out with its asymmetric failure policy
//! - `service`: the orchestration service the boundary layer calls

pub mod inscription;
pub mod receipt;
pub mod invoice;
pub mod ports;
pub mod adapters;
pub mod notifier;
pub mod service;
pub mod error;

pub use inscription::{
    Inscription, InscriptionAggregate, InscriptionUpdate, NewInscription,
};
pub use receipt::{Receipt, StoredReceipt};
pub use invoice::{Invoice, NewInvoice};
pub use ports::{
    ChatInvitePort, CourseMapping, CourseMappingPort, CoursePlatformPort, EnrollmentStore,
    InscriptionTransition, PaymentVerification, ReceiptStoragePort,
};
pub use adapters::{
    ChatInviteConfig, CoursePlatformConfig, FsReceiptStorage, HttpChatInvite, HttpCoursePlatform,
};
pub use notifier::{EnrollmentNotifier, FailurePolicy, MatriculationNotifier, NotifierConfig};
pub use service::EnrollmentService;
pub use error::InvoiceError;
