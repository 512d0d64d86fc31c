//! Inscription and invoice handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::dto::enrollment::*;
use crate::{error::ApiError, AppState};

/// Creates an inscription
pub async fn create_inscription(
    State(state): State<AppState>,
    Json(request): Json<CreateInscriptionRequest>,
) -> Result<(StatusCode, Json<InscriptionResponse>), ApiError> {
    let aggregate = state.service.create_inscription(request.into()).await?;
    Ok((StatusCode::CREATED, Json(aggregate.into())))
}

/// Gets an inscription with its related entities
pub async fn get_inscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InscriptionResponse>, ApiError> {
    let aggregate = state.service.get_inscription(id.into()).await?;
    Ok(Json(aggregate.into()))
}

/// Applies a partial update to an inscription
///
/// Setting `matriculated` to true confirms the enrollment and triggers the
/// notification fan-out.
pub async fn update_inscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInscriptionRequest>,
) -> Result<Json<InscriptionResponse>, ApiError> {
    let aggregate = state
        .service
        .update_inscription(id.into(), request.into())
        .await?;
    Ok(Json(aggregate.into()))
}

/// Resends the chat invite for a matriculated inscription
pub async fn resend_invite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResendInviteResponse>, ApiError> {
    let sent = state.service.resend_invite(id.into()).await?;
    Ok(Json(ResendInviteResponse { sent }))
}

/// Issues an invoice for an inscription
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), ApiError> {
    let invoice = state.service.create_invoice(request.into()).await?;
    Ok((StatusCode::CREATED, Json(invoice.into())))
}

/// Gets an invoice by ID
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let invoice = state.service.get_invoice(id.into()).await?;
    Ok(Json(invoice.into()))
}

/// Confirms the payment behind an invoice
///
/// Verification is idempotent: repeated calls return the verified invoice
/// without re-running the matriculation fan-out.
pub async fn verify_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let invoice = state.service.verify_payment(id.into()).await?;
    Ok(Json(invoice.into()))
}
