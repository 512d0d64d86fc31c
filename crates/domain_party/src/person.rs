//! Person entity
//!
//! A Person is created once per physical participant, keyed by a unique
//! identity document. Everything except the contact fields is immutable
//! after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::PersonId;

use crate::identity::IdentityDocument;

/// A course participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,
    /// Validated identity document (unique across persons)
    pub document: IdentityDocument,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Contact email (mutable)
    pub email: String,
    /// Contact phone (mutable)
    pub phone: Option<String>,
    /// BCP 47 locale tag used for outbound messages (e.g. "es-EC")
    pub locale: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Creates a new person from an already-validated document
    pub fn new(document: IdentityDocument, request: NewPerson) -> Self {
        let now = Utc::now();
        Self {
            id: PersonId::new_v7(),
            document,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            locale: request.locale,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Applies a partial contact update; omitted fields keep their values
    pub fn update_contact(&mut self, update: UpdateContact) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(locale) = update.locale {
            self.locale = Some(locale);
        }
        self.updated_at = Utc::now();
    }
}

/// Request payload for creating a person
///
/// The `document` here is the raw string as submitted; the boundary runs it
/// through [`crate::identity::IdentityDocument::validate`] before a Person
/// is constructed.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub document: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub locale: Option<String>,
}

/// Partial update of a person's contact fields
#[derive(Debug, Clone, Default)]
pub struct UpdateContact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub locale: Option<String>,
}
