//! Request handlers

pub mod health;
pub mod registry;
pub mod catalog;
pub mod enrollment;
