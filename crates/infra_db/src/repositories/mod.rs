//! Repository implementations
//!
//! Each repository adapts a domain port to PostgreSQL. Row structs stay
//! private to this module; domain types never leak column layout.

pub mod enrollment;

pub use enrollment::{PostgresCourseMappings, PostgresEnrollmentStore};
