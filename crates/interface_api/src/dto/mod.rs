//! Request/response data transfer objects

pub mod registry;
pub mod catalog;
pub mod enrollment;
