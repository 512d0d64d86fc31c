//! Party validation rules
//!
//! Explicit validation functions composed by the boundary layer before a
//! request reaches the enrollment core. Each function returns a
//! `ValidationResult` carrying every problem found, so callers can report
//! all offending fields at once instead of failing on the first.
//!
//! # Validation Rules
//!
//! ## Person
//! - Identity document must be a valid national ID or passport
//! - First and last name must be non-empty
//! - Email must be plausibly shaped
//!
//! ## Billing information
//! - Legal name and tax ID must be non-empty
//! - Billing email must be plausibly shaped

use crate::billing::NewBillingInfo;
use crate::identity::IdentityDocument;
use crate::person::NewPerson;

/// Result of a validation pass
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the input is valid
    pub is_valid: bool,
    /// List of validation errors
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Creates a failed validation result with errors
    pub fn fail(errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Merges another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validates a person-creation request
pub fn validate_new_person(request: &NewPerson) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if let Err(e) = IdentityDocument::validate(&request.document) {
        result.add_error(e.to_string());
    }

    if request.first_name.trim().is_empty() {
        result.add_error("First name is required");
    }
    if request.last_name.trim().is_empty() {
        result.add_error("Last name is required");
    }

    validate_email(&request.email, &mut result);

    result
}

/// Validates a billing-information request
pub fn validate_new_billing_info(request: &NewBillingInfo) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if request.legal_name.trim().is_empty() {
        result.add_error("Legal name is required");
    }
    if request.tax_id.trim().is_empty() {
        result.add_error("Tax ID is required");
    }

    validate_email(&request.email, &mut result);

    result
}

fn validate_email(email: &str, result: &mut ValidationResult) {
    if !email.contains('@') || !email.contains('.') {
        result.add_error(format!("Invalid email format: {}", email));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_person() -> NewPerson {
        NewPerson {
            document: "0402084040".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Quinde".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            locale: None,
        }
    }

    #[test]
    fn test_valid_person_passes() {
        let result = validate_new_person(&valid_person());
        assert!(result.is_valid, "Errors: {:?}", result.errors);
    }

    #[test]
    fn test_bad_document_collected() {
        let mut request = valid_person();
        request.document = "1234567890".to_string();
        let result = validate_new_person(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("identity document")));
    }

    #[test]
    fn test_all_errors_collected() {
        let request = NewPerson {
            document: "bad".to_string(),
            first_name: "".to_string(),
            last_name: "".to_string(),
            email: "nope".to_string(),
            phone: None,
            locale: None,
        };
        let result = validate_new_person(&request);
        assert_eq!(result.errors.len(), 4);
    }

    #[test]
    fn test_billing_info_requires_tax_id() {
        let request = NewBillingInfo {
            legal_name: "ACME SA".to_string(),
            tax_id: " ".to_string(),
            phone: None,
            email: "billing@acme.com".to_string(),
            address: None,
        };
        let result = validate_new_billing_info(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("Tax ID")));
    }
}
