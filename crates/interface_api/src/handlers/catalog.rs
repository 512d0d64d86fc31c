//! Course and discount handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::dto::catalog::*;
use crate::{error::ApiError, AppState};

/// Creates a course
pub async fn create_course(
    State(state): State<AppState>,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let course = state.service.create_course(request.into()).await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

/// Lists courses ordered by start date
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = state.service.list_courses().await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// Gets a course by ID
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = state.service.get_course(id.into()).await?;
    Ok(Json(course.into()))
}

/// Creates a discount
pub async fn create_discount(
    State(state): State<AppState>,
    Json(request): Json<CreateDiscountRequest>,
) -> Result<(StatusCode, Json<DiscountResponse>), ApiError> {
    let discount = state.service.create_discount(request.into()).await?;
    Ok((StatusCode::CREATED, Json(discount.into())))
}

/// Deletes an unreferenced discount
pub async fn delete_discount(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_discount(id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}
