// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminOnly, AuthenticatedUser, RequireRole},
    models::{
        admin::{AttendantPerformance, CreateUserPayload, SettingsPatch, UserPatch},
        attendance::AttendanceWithName,
        auth::User,
        settings::Settings,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub date: Option<NaiveDate>,
    pub attendant_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Admin",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "Phone already registered"),
    ),
    security(("bearer" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = app_state.admin_service.create_user(&user.0, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Empty patch"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(user_id): Path<Uuid>,
    Json(patch): Json<UserPatch>,
) -> Result<impl IntoResponse, AppError> {
    patch.validate()?;
    let updated = app_state
        .admin_service
        .update_user(&user.0, user_id, patch)
        .await?;
    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/admin/attendance",
    tag = "Admin",
    params(AttendanceQuery),
    responses((status = 200, description = "Attendance records", body = [AttendanceWithName])),
    security(("bearer" = []))
)]
pub async fn get_attendance(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Query(query): Query<AttendanceQuery>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state
        .admin_service
        .list_attendance(query.date, query.attendant_id)
        .await?;
    Ok((StatusCode::OK, Json(records)))
}

#[utoipa::path(
    get,
    path = "/api/admin/performance",
    tag = "Admin",
    responses((status = 200, description = "Per-attendant rollup", body = [AttendantPerformance])),
    security(("bearer" = []))
)]
pub async fn get_performance(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state.admin_service.performance().await?;
    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/settings",
    tag = "Admin",
    request_body = SettingsPatch,
    responses(
        (status = 200, description = "Settings updated", body = Settings),
        (status = 400, description = "Empty patch"),
    ),
    security(("bearer" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Json(patch): Json<SettingsPatch>,
) -> Result<impl IntoResponse, AppError> {
    patch.validate()?;
    let settings = app_state
        .admin_service
        .update_settings(&user.0, patch)
        .await?;
    Ok((StatusCode::OK, Json(settings)))
}
