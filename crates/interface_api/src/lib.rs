//! HTTP API Layer
//!
//! This crate provides the REST API for the enrollment system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each domain
//! - **DTOs**: Request/response data transfer objects
//! - **Error Handling**: Consistent error responses mapped from port errors
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_enrollment::EnrollmentService;
use infra_db::DatabasePool;

use crate::config::ApiConfig;
use crate::handlers::{catalog, enrollment, health, registry};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EnrollmentService>,
    pub pool: DatabasePool,
    pub config: ApiConfig,
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let person_routes = Router::new()
        .route("/", post(registry::create_person))
        .route("/:id", get(registry::get_person))
        .route("/:id/contact", put(registry::update_contact));

    let billing_routes = Router::new()
        .route("/", post(registry::create_billing))
        .route("/:id", get(registry::get_billing));

    let receipt_routes = Router::new()
        .route("/", post(registry::upload_receipt))
        .route("/:id", get(registry::get_receipt))
        .route("/:id", delete(registry::delete_receipt));

    let course_routes = Router::new()
        .route("/", post(catalog::create_course))
        .route("/", get(catalog::list_courses))
        .route("/:id", get(catalog::get_course));

    let discount_routes = Router::new()
        .route("/", post(catalog::create_discount))
        .route("/:id", delete(catalog::delete_discount));

    let inscription_routes = Router::new()
        .route("/", post(enrollment::create_inscription))
        .route("/:id", get(enrollment::get_inscription))
        .route("/:id", put(enrollment::update_inscription))
        .route("/:id/invite", post(enrollment::resend_invite));

    let invoice_routes = Router::new()
        .route("/", post(enrollment::create_invoice))
        .route("/:id", get(enrollment::get_invoice))
        .route("/:id/verify", post(enrollment::verify_payment));

    let api_routes = Router::new()
        .nest("/persons", person_routes)
        .nest("/billing", billing_routes)
        .nest("/receipts", receipt_routes)
        .nest("/courses", course_routes)
        .nest("/discounts", discount_routes)
        .nest("/inscriptions", inscription_routes)
        .nest("/invoices", invoice_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
