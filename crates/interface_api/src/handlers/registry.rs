//! Person, billing and receipt handlers

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::dto::registry::*;
use crate::{error::ApiError, AppState};

/// Registers a new person
pub async fn create_person(
    State(state): State<AppState>,
    Json(request): Json<CreatePersonRequest>,
) -> Result<(StatusCode, Json<PersonResponse>), ApiError> {
    let person = state.service.register_person(request.into()).await?;
    Ok((StatusCode::CREATED, Json(person.into())))
}

/// Gets a person by ID
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PersonResponse>, ApiError> {
    let person = state.service.get_person(id.into()).await?;
    Ok(Json(person.into()))
}

/// Updates a person's contact details
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateContactRequest>,
) -> Result<Json<PersonResponse>, ApiError> {
    let person = state
        .service
        .update_person_contact(id.into(), request.into())
        .await?;
    Ok(Json(person.into()))
}

/// Registers billing information
pub async fn create_billing(
    State(state): State<AppState>,
    Json(request): Json<CreateBillingRequest>,
) -> Result<(StatusCode, Json<BillingResponse>), ApiError> {
    let billing = state.service.register_billing_info(request.into()).await?;
    Ok((StatusCode::CREATED, Json(billing.into())))
}

/// Gets billing information by ID
pub async fn get_billing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BillingResponse>, ApiError> {
    let billing = state.service.get_billing_info(id.into()).await?;
    Ok(Json(billing.into()))
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
}

/// Uploads a payment receipt
///
/// The file arrives as the raw request body; the filename comes from the
/// query string and the MIME type from the Content-Type header.
pub async fn upload_receipt(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ReceiptResponse>), ApiError> {
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let receipt = state
        .service
        .upload_receipt(body.to_vec(), &params.filename, &mime_type)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt.into())))
}

/// Gets receipt metadata by ID
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReceiptResponse>, ApiError> {
    let receipt = state.service.get_receipt(id.into()).await?;
    Ok(Json(receipt.into()))
}

/// Deletes an unbound receipt
pub async fn delete_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_receipt(id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}
