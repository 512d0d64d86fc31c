//! End-to-end tests for the enrollment flow
//!
//! Exercises the orchestration service against the in-memory adapters,
//! from registration through payment verification and the notification
//! fan-out.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal_macros::dec;

use core_kernel::{DomainPort, Money, PortError};
use domain_catalog::{DiscountKind, NewDiscount};
use domain_enrollment::ports::mock::{
    MockCourseMappings, MockEnrollmentStore, MockReceiptStorage,
};
use domain_enrollment::{
    CourseMapping, EnrollmentNotifier, EnrollmentService, InscriptionAggregate,
    InscriptionUpdate, MatriculationNotifier, NewInscription, NotifierConfig,
    ChatInvitePort, CoursePlatformPort,
};
use test_utils::{
    DocumentFixtures, TestBillingBuilder, TestCourseBuilder, TestInvoiceBuilder,
    TestPersonBuilder,
};

/// Notifier double that counts fan-outs and optionally fails
struct CountingNotifier {
    fan_outs: AtomicUsize,
    resends: AtomicUsize,
    fail: bool,
}

impl CountingNotifier {
    fn new() -> Self {
        Self {
            fan_outs: AtomicUsize::new(0),
            resends: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fan_outs: AtomicUsize::new(0),
            resends: AtomicUsize::new(0),
            fail: true,
        }
    }
}

impl DomainPort for CountingNotifier {}

#[async_trait]
impl MatriculationNotifier for CountingNotifier {
    async fn on_matriculated(&self, _aggregate: &InscriptionAggregate) -> Result<(), PortError> {
        self.fan_outs.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(PortError::ServiceUnavailable {
                service: "course-platform".to_string(),
            })
        } else {
            Ok(())
        }
    }

    async fn resend_invite(&self, aggregate: &InscriptionAggregate) -> bool {
        self.resends.fetch_add(1, Ordering::SeqCst);
        aggregate.inscription.matriculated
    }
}

fn service_with(notifier: Arc<CountingNotifier>) -> EnrollmentService {
    EnrollmentService::new(
        Arc::new(MockEnrollmentStore::new()),
        notifier,
        Arc::new(MockReceiptStorage::new()),
    )
}

/// Registers everything an inscription needs and creates it
async fn seed_inscription(service: &EnrollmentService) -> InscriptionAggregate {
    let person = service
        .register_person(TestPersonBuilder::new().build())
        .await
        .unwrap();
    let billing = service
        .register_billing_info(TestBillingBuilder::new().build())
        .await
        .unwrap();
    let receipt = service
        .upload_receipt(b"fake pdf bytes".to_vec(), "transfer.pdf", "application/pdf")
        .await
        .unwrap();
    let course = service
        .create_course(TestCourseBuilder::new().build())
        .await
        .unwrap();

    service
        .create_inscription(NewInscription {
            course_id: course.id,
            person_id: person.id,
            billing_id: billing.id,
            receipt_id: receipt.id,
            discount_id: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_full_enrollment_happy_path() {
    let notifier = Arc::new(CountingNotifier::new());
    let service = service_with(notifier.clone());

    let aggregate = seed_inscription(&service).await;
    assert!(!aggregate.inscription.matriculated);
    assert_eq!(aggregate.payable_amount().amount(), dec!(350.00));

    let invoice = service
        .create_invoice(
            TestInvoiceBuilder::new(aggregate.inscription.id, aggregate.billing.id).build(),
        )
        .await
        .unwrap();
    assert!(!invoice.payment_verified);
    // Nothing fires until the payment is verified
    assert_eq!(notifier.fan_outs.load(Ordering::SeqCst), 0);

    let verified = service.verify_payment(invoice.id).await.unwrap();
    assert!(verified.payment_verified);
    assert!(verified.verified_at.is_some());

    let after = service.get_inscription(aggregate.inscription.id).await.unwrap();
    assert!(after.inscription.matriculated);
    assert_eq!(notifier.fan_outs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_repeated_verification_notifies_once() {
    let notifier = Arc::new(CountingNotifier::new());
    let service = service_with(notifier.clone());

    let aggregate = seed_inscription(&service).await;
    let invoice = service
        .create_invoice(
            TestInvoiceBuilder::new(aggregate.inscription.id, aggregate.billing.id).build(),
        )
        .await
        .unwrap();

    for _ in 0..3 {
        let verified = service.verify_payment(invoice.id).await.unwrap();
        assert!(verified.payment_verified);
    }
    assert_eq!(notifier.fan_outs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_platform_failure_keeps_verified_state() {
    let notifier = Arc::new(CountingNotifier::failing());
    let service = service_with(notifier.clone());

    let aggregate = seed_inscription(&service).await;
    let invoice = service
        .create_invoice(
            TestInvoiceBuilder::new(aggregate.inscription.id, aggregate.billing.id).build(),
        )
        .await
        .unwrap();

    let err = service.verify_payment(invoice.id).await.unwrap_err();
    assert!(err.is_transient());

    // The committed transitions stand despite the fan-out failure
    let stored_invoice = service.get_invoice(invoice.id).await.unwrap();
    assert!(stored_invoice.payment_verified);
    let after = service.get_inscription(aggregate.inscription.id).await.unwrap();
    assert!(after.inscription.matriculated);

    // A retry finds nothing left to do and does not re-notify
    let retried = service.verify_payment(invoice.id).await.unwrap();
    assert!(retried.payment_verified);
    assert_eq!(notifier.fan_outs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_manual_matriculation_notifies_once() {
    let notifier = Arc::new(CountingNotifier::new());
    let service = service_with(notifier.clone());
    let aggregate = seed_inscription(&service).await;

    let updated = service
        .update_inscription(
            aggregate.inscription.id,
            InscriptionUpdate {
                matriculated: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.inscription.matriculated);
    assert_eq!(notifier.fan_outs.load(Ordering::SeqCst), 1);

    // Re-sending true is a no-op
    service
        .update_inscription(
            aggregate.inscription.id,
            InscriptionUpdate {
                matriculated: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(notifier.fan_outs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_discount_applied_through_update() {
    let notifier = Arc::new(CountingNotifier::new());
    let service = service_with(notifier.clone());
    let aggregate = seed_inscription(&service).await;

    let discount = service
        .create_discount(NewDiscount {
            kind: DiscountKind::EarlyBird,
            amount_off: Money::new(dec!(50.00)),
            percent_off: None,
            description: "Early bird".to_string(),
        })
        .await
        .unwrap();

    let updated = service
        .update_inscription(
            aggregate.inscription.id,
            InscriptionUpdate {
                discount_id: Some(discount.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.payable_amount().amount(), dec!(300.00));
    // Applying a discount alone never triggers the fan-out
    assert_eq!(notifier.fan_outs.load(Ordering::SeqCst), 0);

    // And the discount can no longer be deleted
    let err = service.delete_discount(discount.id).await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_unknown_discount_rejected_on_update() {
    let service = service_with(Arc::new(CountingNotifier::new()));
    let aggregate = seed_inscription(&service).await;

    let err = service
        .update_inscription(
            aggregate.inscription.id,
            InscriptionUpdate {
                discount_id: Some(core_kernel::DiscountId::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_invalid_document_rejected_at_registration() {
    let service = service_with(Arc::new(CountingNotifier::new()));
    let err = service
        .register_person(
            TestPersonBuilder::new()
                .with_document(DocumentFixtures::bad_checksum_id())
                .build(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Validation { .. }));
}

#[tokio::test]
async fn test_second_inscription_for_same_course_conflicts() {
    let service = service_with(Arc::new(CountingNotifier::new()));
    let aggregate = seed_inscription(&service).await;

    let second_receipt = service
        .upload_receipt(b"other".to_vec(), "other.pdf", "application/pdf")
        .await
        .unwrap();
    let err = service
        .create_inscription(NewInscription {
            course_id: aggregate.course.id,
            person_id: aggregate.person.id,
            billing_id: aggregate.billing.id,
            receipt_id: second_receipt.id,
            discount_id: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_duplicate_invoice_number_conflicts() {
    let service = service_with(Arc::new(CountingNotifier::new()));
    let aggregate = seed_inscription(&service).await;

    let request = |entry: &str, number: &str| {
        TestInvoiceBuilder::new(aggregate.inscription.id, aggregate.billing.id)
            .with_numbers(entry, number)
            .build()
    };

    service
        .create_invoice(request("ING-1", "FAC-1"))
        .await
        .unwrap();
    let err = service
        .create_invoice(request("ING-2", "FAC-1"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_receipt_lifecycle() {
    let service = service_with(Arc::new(CountingNotifier::new()));
    let aggregate = seed_inscription(&service).await;

    // Bound receipt cannot be deleted
    let err = service
        .delete_receipt(aggregate.receipt.id)
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    // An unbound one can
    let unbound = service
        .upload_receipt(b"loose".to_vec(), "loose.pdf", "application/pdf")
        .await
        .unwrap();
    service.delete_receipt(unbound.id).await.unwrap();
    assert!(service.get_receipt(unbound.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_receipt_delete_succeeds_when_file_removal_fails() {
    let service = EnrollmentService::new(
        Arc::new(MockEnrollmentStore::new()),
        Arc::new(CountingNotifier::new()),
        Arc::new(MockReceiptStorage::with_failing_deletes()),
    );

    let receipt = service
        .upload_receipt(b"loose".to_vec(), "loose.pdf", "application/pdf")
        .await
        .unwrap();

    // File removal is best-effort; the record deletion alone decides the outcome
    service.delete_receipt(receipt.id).await.unwrap();
    assert!(service.get_receipt(receipt.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_empty_receipt_upload_rejected() {
    let service = service_with(Arc::new(CountingNotifier::new()));
    let err = service
        .upload_receipt(Vec::new(), "empty.pdf", "application/pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Validation { .. }));
}

#[tokio::test]
async fn test_resend_invite_reflects_matriculation() {
    let notifier = Arc::new(CountingNotifier::new());
    let service = service_with(notifier.clone());
    let aggregate = seed_inscription(&service).await;

    assert!(!service.resend_invite(aggregate.inscription.id).await.unwrap());

    service
        .update_inscription(
            aggregate.inscription.id,
            InscriptionUpdate {
                matriculated: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(service.resend_invite(aggregate.inscription.id).await.unwrap());
    assert_eq!(notifier.resends.load(Ordering::SeqCst), 2);
}

/// Wires the real notifier into the service to cover the whole path
#[tokio::test]
async fn test_real_notifier_end_to_end() {
    struct OkPlatform(AtomicUsize);
    impl DomainPort for OkPlatform {}

    #[async_trait]
    impl CoursePlatformPort for OkPlatform {
        async fn enroll(&self, _: &str, _: &str, _: &str) -> Result<String, PortError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok("platform-user-1".to_string())
        }
    }

    struct OkChat(AtomicUsize);
    impl DomainPort for OkChat {}

    #[async_trait]
    impl ChatInvitePort for OkChat {
        async fn send_invite(&self, _: &str, _: &str) -> Result<(), PortError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    let store = Arc::new(MockEnrollmentStore::new());
    let platform = Arc::new(OkPlatform(AtomicUsize::new(0)));
    let chat = Arc::new(OkChat(AtomicUsize::new(0)));

    // The course is created first so the mapping can reference it
    let bootstrap = EnrollmentService::new(
        store.clone(),
        Arc::new(CountingNotifier::new()),
        Arc::new(MockReceiptStorage::new()),
    );
    let course = bootstrap
        .create_course(
            TestCourseBuilder::new()
                .with_short_name("DATA-201")
                .with_price(Money::new(dec!(500.00)))
                .build(),
        )
        .await
        .unwrap();

    let mappings = MockCourseMappings::new().with_mapping(CourseMapping {
        course_id: course.id,
        external_course_id: "ext-data-201".to_string(),
        invite_link: Some("https://chat.example/data-201".to_string()),
    });
    let notifier = EnrollmentNotifier::new(
        Arc::new(mappings),
        platform.clone(),
        chat.clone(),
        NotifierConfig::default(),
    );
    let service = EnrollmentService::new(
        store,
        Arc::new(notifier),
        Arc::new(MockReceiptStorage::new()),
    );

    let person = service
        .register_person(TestPersonBuilder::new().build())
        .await
        .unwrap();
    let billing = service
        .register_billing_info(TestBillingBuilder::new().build())
        .await
        .unwrap();
    let receipt = service
        .upload_receipt(b"pdf".to_vec(), "t.pdf", "application/pdf")
        .await
        .unwrap();
    let aggregate = service
        .create_inscription(NewInscription {
            course_id: course.id,
            person_id: person.id,
            billing_id: billing.id,
            receipt_id: receipt.id,
            discount_id: None,
        })
        .await
        .unwrap();

    let invoice = service
        .create_invoice(
            TestInvoiceBuilder::new(aggregate.inscription.id, billing.id)
                .with_amount(dec!(500.00))
                .with_numbers("ING-2026-0042", "001-002-000000777")
                .build(),
        )
        .await
        .unwrap();
    service.verify_payment(invoice.id).await.unwrap();

    assert_eq!(platform.0.load(Ordering::SeqCst), 1);
    assert_eq!(chat.0.load(Ordering::SeqCst), 1);
}
