//! Core Kernel - Foundational types and utilities for the enrollment system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money with precise decimal arithmetic (2 decimal places)
//! - Date ranges for course schedules
//! - Strongly typed identifiers and value objects
//! - Port infrastructure shared by repository and integration adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, MoneyError};
pub use temporal::{DateRange, TemporalError};
pub use identifiers::{
    PersonId, CourseId, BillingInfoId, ReceiptId, DiscountId, InscriptionId, InvoiceId,
};
pub use ports::{PortError, DomainPort};
