//! HTTP adapters for the external enrollment integrations
//!
//! Thin reqwest-based clients behind [`CoursePlatformPort`] and
//! [`ChatInvitePort`]. Response status codes are mapped onto the unified
//! port error so the notifier's failure policies apply uniformly:
//! 404 becomes `NotFound`, 5xx and 429 become `ServiceUnavailable`,
//! request timeouts become `Timeout`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{DomainPort, PortError};

use crate::ports::{ChatInvitePort, CoursePlatformPort};

/// Configuration for the course platform client
#[derive(Debug, Clone)]
pub struct CoursePlatformConfig {
    /// Base URL of the platform API (e.g. "https://campus.example.com/api/v1")
    pub base_url: String,
    /// API key sent as a bearer token
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Course platform client
#[derive(Debug, Clone)]
pub struct HttpCoursePlatform {
    client: Client,
    config: CoursePlatformConfig,
}

#[derive(Serialize)]
struct EnrollRequest<'a> {
    course_id: &'a str,
    email: &'a str,
    full_name: &'a str,
}

#[derive(Deserialize)]
struct EnrollResponse {
    user_id: String,
}

impl HttpCoursePlatform {
    pub fn new(config: CoursePlatformConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PortError::internal(format!("HTTP client build failed: {e}")))?;
        Ok(Self { client, config })
    }
}

impl DomainPort for HttpCoursePlatform {}

#[async_trait]
impl CoursePlatformPort for HttpCoursePlatform {
    async fn enroll(
        &self,
        external_course_id: &str,
        email: &str,
        full_name: &str,
    ) -> Result<String, PortError> {
        let url = format!("{}/enrollments", self.config.base_url);
        debug!(%url, course = external_course_id, "Enrolling participant on course platform");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&EnrollRequest {
                course_id: external_course_id,
                email,
                full_name,
            })
            .send()
            .await
            .map_err(|e| request_error("platform.enroll", &self.config.timeout, e))?;

        let response = check_status("course-platform", response)?;
        let body: EnrollResponse = response
            .json()
            .await
            .map_err(|e| PortError::internal(format!("Malformed platform response: {e}")))?;
        Ok(body.user_id)
    }
}

/// Configuration for the chat invite client
#[derive(Debug, Clone)]
pub struct ChatInviteConfig {
    /// Base URL of the messaging gateway
    pub base_url: String,
    /// API key sent as a bearer token
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Chat invite client
#[derive(Debug, Clone)]
pub struct HttpChatInvite {
    client: Client,
    config: ChatInviteConfig,
}

#[derive(Serialize)]
struct InviteRequest<'a> {
    invite_link: &'a str,
    email: &'a str,
}

impl HttpChatInvite {
    pub fn new(config: ChatInviteConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PortError::internal(format!("HTTP client build failed: {e}")))?;
        Ok(Self { client, config })
    }
}

impl DomainPort for HttpChatInvite {}

#[async_trait]
impl ChatInvitePort for HttpChatInvite {
    async fn send_invite(&self, invite_link: &str, email: &str) -> Result<(), PortError> {
        let url = format!("{}/invites", self.config.base_url);
        debug!(%url, "Sending chat invite");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&InviteRequest { invite_link, email })
            .send()
            .await
            .map_err(|e| request_error("chat.send_invite", &self.config.timeout, e))?;

        check_status("chat-gateway", response)?;
        Ok(())
    }
}

/// Receipt storage on the local filesystem
///
/// Files land under `root/yyyy/mm/<uuid>-<filename>`; the returned storage
/// path is relative to the root so the root can move between environments.
#[derive(Debug, Clone)]
pub struct FsReceiptStorage {
    root: std::path::PathBuf,
}

impl FsReceiptStorage {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DomainPort for FsReceiptStorage {}

#[async_trait]
impl crate::ports::ReceiptStoragePort for FsReceiptStorage {
    async fn store(
        &self,
        content: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<crate::receipt::StoredReceipt, PortError> {
        let now = chrono::Utc::now();
        let relative = format!(
            "{}/{:02}/{}-{}",
            now.format("%Y"),
            chrono::Datelike::month(&now),
            uuid::Uuid::new_v4(),
            sanitize_filename(filename)
        );
        let full = self.root.join(&relative);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortError::internal(format!("Receipt dir creation failed: {e}")))?;
        }
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| PortError::internal(format!("Receipt write failed: {e}")))?;

        Ok(crate::receipt::StoredReceipt {
            path: relative,
            mime_type: mime_type.to_string(),
            filename: filename.to_string(),
        })
    }

    async fn delete(&self, path: &str) -> Result<(), PortError> {
        let full = self.root.join(path);
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PortError::not_found("ReceiptFile", path))
            }
            Err(e) => Err(PortError::internal(format!("Receipt delete failed: {e}"))),
        }
    }
}

fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn request_error(operation: &str, timeout: &Duration, error: reqwest::Error) -> PortError {
    if error.is_timeout() {
        PortError::Timeout {
            operation: operation.to_string(),
            duration_ms: timeout.as_millis() as u64,
        }
    } else if error.is_connect() {
        PortError::Connection {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    } else {
        PortError::Internal {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }
}

fn check_status(service: &str, response: Response) -> Result<Response, PortError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let path = response.url().path().to_string();
    Err(map_status(service, status, &path))
}

fn map_status(service: &str, status: StatusCode, path: &str) -> PortError {
    match status {
        StatusCode::NOT_FOUND => PortError::not_found(service, path),
        StatusCode::TOO_MANY_REQUESTS => PortError::ServiceUnavailable {
            service: service.to_string(),
        },
        s if s.is_server_error() => PortError::ServiceUnavailable {
            service: service.to_string(),
        },
        s => PortError::internal(format!("{service} returned unexpected status {s}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let service = "course-platform";
        assert!(map_status(service, StatusCode::NOT_FOUND, "/enrollments").is_not_found());
        assert!(matches!(
            map_status(service, StatusCode::SERVICE_UNAVAILABLE, "/"),
            PortError::ServiceUnavailable { .. }
        ));
        assert!(matches!(
            map_status(service, StatusCode::TOO_MANY_REQUESTS, "/"),
            PortError::ServiceUnavailable { .. }
        ));
        assert!(matches!(
            map_status(service, StatusCode::IM_A_TEAPOT, "/"),
            PortError::Internal { .. }
        ));
    }

    #[test]
    fn test_transient_statuses_are_retryable() {
        let err = map_status("chat-gateway", StatusCode::BAD_GATEWAY, "/invites");
        assert!(err.is_transient());
    }

    #[test]
    fn test_filename_sanitization() {
        assert_eq!(sanitize_filename("pago enero.pdf"), "pago_enero.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("receipt-42_v2.PDF"), "receipt-42_v2.PDF");
    }
}
