//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence layer for the enrollment
//! system, implementing the domain's storage ports with SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: domain crates define port
//! traits, this crate adapts them to PostgreSQL. Uniqueness rules live in
//! the schema and surface as conflicts through the unified port error.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, PostgresEnrollmentStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/enrollment")).await?;
//! let store = PostgresEnrollmentStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;

pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use repositories::{PostgresCourseMappings, PostgresEnrollmentStore};

/// Runs the embedded migrations against the given pool
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
}
