//! Matriculation notification fan-out
//!
//! When an inscription becomes matriculated the participant is enrolled on
//! the external course platform and invited to the course chat group. The
//! two integrations fail differently on purpose: a platform enrollment
//! failure propagates so the back office notices, while a chat invite
//! failure is logged and swallowed because the link can be resent later.
//! The chat invite is attempted even when the platform call failed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use core_kernel::{DomainPort, PortError};

use crate::inscription::InscriptionAggregate;
use crate::ports::{ChatInvitePort, CourseMappingPort, CoursePlatformPort};

/// How a failed integration call is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The error is returned to the caller
    Propagate,
    /// The error is logged at warn level and discarded
    LogAndSwallow,
}

/// Notifier settings
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Master switch for the course platform integration
    pub platform_enabled: bool,
    /// Upper bound for each outbound call
    pub call_timeout: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            platform_enabled: true,
            call_timeout: Duration::from_secs(10),
        }
    }
}

/// Port the orchestrator uses to announce matriculations
#[async_trait]
pub trait MatriculationNotifier: DomainPort {
    /// Runs the full fan-out for a freshly matriculated inscription
    async fn on_matriculated(&self, aggregate: &InscriptionAggregate) -> Result<(), PortError>;

    /// Resends the chat invite; returns whether a send actually happened
    async fn resend_invite(&self, aggregate: &InscriptionAggregate) -> bool;
}

/// Production notifier wired to the integration ports
pub struct EnrollmentNotifier {
    mappings: Arc<dyn CourseMappingPort>,
    platform: Arc<dyn CoursePlatformPort>,
    chat: Arc<dyn ChatInvitePort>,
    config: NotifierConfig,
}

impl EnrollmentNotifier {
    pub fn new(
        mappings: Arc<dyn CourseMappingPort>,
        platform: Arc<dyn CoursePlatformPort>,
        chat: Arc<dyn ChatInvitePort>,
        config: NotifierConfig,
    ) -> Self {
        Self {
            mappings,
            platform,
            chat,
            config,
        }
    }

    /// Runs one integration call under the timeout and the given policy
    ///
    /// Returns `Ok(None)` when a failure was swallowed.
    async fn call_with_policy<T, F>(
        &self,
        policy: FailurePolicy,
        operation: &str,
        fut: F,
    ) -> Result<Option<T>, PortError>
    where
        F: Future<Output = Result<T, PortError>>,
    {
        let outcome = match tokio::time::timeout(self.config.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.config.call_timeout.as_millis() as u64,
            }),
        };

        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(err) => match policy {
                FailurePolicy::Propagate => Err(err),
                FailurePolicy::LogAndSwallow => {
                    warn!(operation, error = %err, "Integration call failed, continuing");
                    Ok(None)
                }
            },
        }
    }

    async fn send_invite_if_mapped(
        &self,
        invite_link: Option<&str>,
        aggregate: &InscriptionAggregate,
    ) -> Result<(), PortError> {
        let Some(link) = invite_link else {
            info!(
                inscription_id = %aggregate.inscription.id,
                "Course has no chat invite link, skipping invite"
            );
            return Ok(());
        };
        // Invite failures never block matriculation
        self.call_with_policy(
            FailurePolicy::LogAndSwallow,
            "chat.send_invite",
            self.chat.send_invite(link, &aggregate.person.email),
        )
        .await?;
        Ok(())
    }
}

impl DomainPort for EnrollmentNotifier {}

#[async_trait]
impl MatriculationNotifier for EnrollmentNotifier {
    async fn on_matriculated(&self, aggregate: &InscriptionAggregate) -> Result<(), PortError> {
        let inscription_id = aggregate.inscription.id;

        let Some(mapping) = self.mappings.mapping_for(aggregate.course.id).await? else {
            info!(%inscription_id, course_id = %aggregate.course.id,
                "Course has no integration mapping, skipping fan-out");
            return Ok(());
        };

        let platform_outcome = if self.config.platform_enabled {
            self.call_with_policy(
                FailurePolicy::Propagate,
                "platform.enroll",
                self.platform.enroll(
                    &mapping.external_course_id,
                    &aggregate.person.email,
                    &aggregate.person.full_name(),
                ),
            )
            .await
            .map(|user| {
                info!(%inscription_id, platform_user = ?user, "Enrolled on course platform");
            })
        } else {
            info!(%inscription_id, "Course platform integration disabled, skipping enrollment");
            Ok(())
        };

        // The invite runs whether or not the platform call succeeded
        self.send_invite_if_mapped(mapping.invite_link.as_deref(), aggregate)
            .await?;

        platform_outcome
    }

    async fn resend_invite(&self, aggregate: &InscriptionAggregate) -> bool {
        if !aggregate.inscription.matriculated {
            return false;
        }
        let mapping = match self.mappings.mapping_for(aggregate.course.id).await {
            Ok(Some(mapping)) => mapping,
            Ok(None) => return false,
            Err(err) => {
                warn!(error = %err, "Mapping lookup failed during invite resend");
                return false;
            }
        };
        let Some(link) = mapping.invite_link else {
            return false;
        };

        let sent = tokio::time::timeout(
            self.config.call_timeout,
            self.chat.send_invite(&link, &aggregate.person.email),
        )
        .await;
        match sent {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                warn!(error = %err, "Chat invite resend failed");
                false
            }
            Err(_) => {
                warn!("Chat invite resend timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use core_kernel::{CourseId, Money};
    use domain_catalog::{Course, CourseModality, NewCourse};
    use domain_party::{BillingInfo, IdentityDocument, NewBillingInfo, NewPerson, Person};

    use super::*;
    use crate::inscription::{Inscription, NewInscription};
    use crate::ports::mock::MockCourseMappings;
    use crate::ports::CourseMapping;
    use crate::receipt::{Receipt, StoredReceipt};

    struct CountingPlatform {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingPlatform {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl DomainPort for CountingPlatform {}

    #[async_trait]
    impl CoursePlatformPort for CountingPlatform {
        async fn enroll(
            &self,
            _external_course_id: &str,
            email: &str,
            _full_name: &str,
        ) -> Result<String, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PortError::ServiceUnavailable {
                    service: "course-platform".to_string(),
                })
            } else {
                Ok(format!("user-{email}"))
            }
        }
    }

    struct CountingChat {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingChat {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl DomainPort for CountingChat {}

    #[async_trait]
    impl ChatInvitePort for CountingChat {
        async fn send_invite(&self, _invite_link: &str, _email: &str) -> Result<(), PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PortError::connection("chat gateway unreachable"))
            } else {
                Ok(())
            }
        }
    }

    fn aggregate(matriculated: bool) -> InscriptionAggregate {
        let person = Person::new(
            IdentityDocument::validate("0402084040").unwrap(),
            NewPerson {
                document: "0402084040".to_string(),
                first_name: "Maria".to_string(),
                last_name: "Quinde".to_string(),
                email: "maria@example.com".to_string(),
                phone: None,
                locale: None,
            },
        );
        let course = Course::new(
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
        .unwrap();
        let billing = BillingInfo::new(NewBillingInfo {
            legal_name: "Maria Quinde".to_string(),
            tax_id: "0402084040001".to_string(),
            phone: None,
            email: "maria@example.com".to_string(),
            address: Some("Quito".to_string()),
        });
        let receipt = Receipt::from_stored(StoredReceipt {
            path: "receipts/r1.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            filename: "r1.pdf".to_string(),
        });
        let mut inscription = Inscription::new(NewInscription {
            course_id: course.id,
            person_id: person.id,
            billing_id: billing.id,
            receipt_id: receipt.id,
            discount_id: None,
        });
        if matriculated {
            inscription.matriculate();
        }

        InscriptionAggregate {
            inscription,
            person,
            course,
            billing,
            receipt,
            discount: None,
        }
    }

    fn mapping_for(course_id: CourseId, invite_link: Option<&str>) -> CourseMapping {
        CourseMapping {
            course_id,
            external_course_id: "ext-rust-101".to_string(),
            invite_link: invite_link.map(str::to_string),
        }
    }

    fn notifier(
        mappings: MockCourseMappings,
        platform: Arc<CountingPlatform>,
        chat: Arc<CountingChat>,
    ) -> EnrollmentNotifier {
        EnrollmentNotifier::new(
            Arc::new(mappings),
            platform,
            chat,
            NotifierConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_happy_path_enrolls_and_invites() {
        let agg = aggregate(true);
        let platform = Arc::new(CountingPlatform::new(false));
        let chat = Arc::new(CountingChat::new(false));
        let mappings = MockCourseMappings::new()
            .with_mapping(mapping_for(agg.course.id, Some("https://chat.example/inv")));
        let notifier = notifier(mappings, platform.clone(), chat.clone());

        notifier.on_matriculated(&agg).await.unwrap();
        assert_eq!(platform.calls.load(Ordering::SeqCst), 1);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_platform_failure_propagates_but_invite_still_sent() {
        let agg = aggregate(true);
        let platform = Arc::new(CountingPlatform::new(true));
        let chat = Arc::new(CountingChat::new(false));
        let mappings = MockCourseMappings::new()
            .with_mapping(mapping_for(agg.course.id, Some("https://chat.example/inv")));
        let notifier = notifier(mappings, platform.clone(), chat.clone());

        let err = notifier.on_matriculated(&agg).await.unwrap_err();
        assert!(err.is_transient());
        // The invite was attempted despite the platform failure
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chat_failure_is_swallowed() {
        let agg = aggregate(true);
        let platform = Arc::new(CountingPlatform::new(false));
        let chat = Arc::new(CountingChat::new(true));
        let mappings = MockCourseMappings::new()
            .with_mapping(mapping_for(agg.course.id, Some("https://chat.example/inv")));
        let notifier = notifier(mappings, platform.clone(), chat.clone());

        assert!(notifier.on_matriculated(&agg).await.is_ok());
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unmapped_course_skips_fan_out() {
        let agg = aggregate(true);
        let platform = Arc::new(CountingPlatform::new(false));
        let chat = Arc::new(CountingChat::new(false));
        let notifier = notifier(MockCourseMappings::new(), platform.clone(), chat.clone());

        assert!(notifier.on_matriculated(&agg).await.is_ok());
        assert_eq!(platform.calls.load(Ordering::SeqCst), 0);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disabled_platform_still_sends_invite() {
        let agg = aggregate(true);
        let platform = Arc::new(CountingPlatform::new(false));
        let chat = Arc::new(CountingChat::new(false));
        let mappings = MockCourseMappings::new()
            .with_mapping(mapping_for(agg.course.id, Some("https://chat.example/inv")));
        let notifier = EnrollmentNotifier::new(
            Arc::new(mappings),
            platform.clone(),
            chat.clone(),
            NotifierConfig {
                platform_enabled: false,
                ..Default::default()
            },
        );

        assert!(notifier.on_matriculated(&agg).await.is_ok());
        assert_eq!(platform.calls.load(Ordering::SeqCst), 0);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_platform_call_times_out() {
        struct SlowPlatform;
        impl DomainPort for SlowPlatform {}

        #[async_trait]
        impl CoursePlatformPort for SlowPlatform {
            async fn enroll(&self, _: &str, _: &str, _: &str) -> Result<String, PortError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok("never".to_string())
            }
        }

        let agg = aggregate(true);
        let chat = Arc::new(CountingChat::new(false));
        let mappings = MockCourseMappings::new()
            .with_mapping(mapping_for(agg.course.id, Some("https://chat.example/inv")));
        let notifier = EnrollmentNotifier::new(
            Arc::new(mappings),
            Arc::new(SlowPlatform),
            chat.clone(),
            NotifierConfig {
                platform_enabled: true,
                call_timeout: Duration::from_millis(20),
            },
        );

        let err = notifier.on_matriculated(&agg).await.unwrap_err();
        assert!(matches!(err, PortError::Timeout { .. }));
        // The invite still went out before the error was returned
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resend_invite_requires_matriculation() {
        let agg = aggregate(false);
        let platform = Arc::new(CountingPlatform::new(false));
        let chat = Arc::new(CountingChat::new(false));
        let mappings = MockCourseMappings::new()
            .with_mapping(mapping_for(agg.course.id, Some("https://chat.example/inv")));
        let notifier = notifier(mappings, platform, chat.clone());

        assert!(!notifier.resend_invite(&agg).await);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resend_invite_reports_failure_as_false() {
        let agg = aggregate(true);
        let platform = Arc::new(CountingPlatform::new(false));
        let chat = Arc::new(CountingChat::new(true));
        let mappings = MockCourseMappings::new()
            .with_mapping(mapping_for(agg.course.id, Some("https://chat.example/inv")));
        let notifier = notifier(mappings, platform, chat.clone());

        assert!(!notifier.resend_invite(&agg).await);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resend_invite_success() {
        let agg = aggregate(true);
        let platform = Arc::new(CountingPlatform::new(false));
        let chat = Arc::new(CountingChat::new(false));
        let mappings = MockCourseMappings::new()
            .with_mapping(mapping_for(agg.course.id, Some("https://chat.example/inv")));
        let notifier = notifier(mappings, platform, chat.clone());

        assert!(notifier.resend_invite(&agg).await);
    }
}
