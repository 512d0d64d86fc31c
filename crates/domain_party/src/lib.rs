//! Party Domain - participants and their billing data
//!
//! This crate models the people who enroll in courses:
//! - `identity`: the national-ID / passport validator
//! - `person`: the Person entity (unique identity document, contact fields)
//! - `billing`: billing information used when invoicing
//! - `validation`: explicit validation functions returning structured error lists

pub mod identity;
pub mod person;
pub mod billing;
pub mod validation;

pub use identity::{IdentityDocument, IdentityError};
pub use person::{NewPerson, Person, UpdateContact};
pub use billing::{BillingInfo, NewBillingInfo};
pub use validation::ValidationResult;
