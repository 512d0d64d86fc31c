//! Catalog Domain - courses on offer and their pricing
//!
//! The catalog is read-mostly: the enrollment core consults courses and
//! discounts but never mutates them as part of an inscription.

pub mod course;
pub mod discount;
pub mod error;

pub use course::{Course, CourseModality, NewCourse};
pub use discount::{final_amount, Discount, DiscountKind, NewDiscount};
pub use error::CatalogError;
