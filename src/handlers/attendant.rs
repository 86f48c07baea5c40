// src/handlers/attendant.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AttendantOnly, AuthenticatedUser, RequireRole},
    models::{
        attendance::AttendanceRecord,
        pass::{PassStatus, PassWithNames},
    },
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkContactedPayload {
    pub pass_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    pub pass_id: Uuid,
    pub status: PassStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddNotePayload {
    pub pass_id: Uuid,
    pub note: String,
}

#[utoipa::path(
    get,
    path = "/api/attendant/assigned",
    tag = "Attendant",
    responses((status = 200, description = "Today's assigned passes", body = [PassWithNames])),
    security(("bearer" = []))
)]
pub async fn get_assigned_passes(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AttendantOnly>,
) -> Result<impl IntoResponse, AppError> {
    let passes = app_state.attendant_service.assigned_today(&user.0).await?;
    Ok((StatusCode::OK, Json(passes)))
}

#[utoipa::path(
    get,
    path = "/api/attendant/upcoming",
    tag = "Attendant",
    responses((status = 200, description = "Upcoming assigned passes", body = [PassWithNames])),
    security(("bearer" = []))
)]
pub async fn get_upcoming_passes(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AttendantOnly>,
) -> Result<impl IntoResponse, AppError> {
    let passes = app_state.attendant_service.upcoming(&user.0).await?;
    Ok((StatusCode::OK, Json(passes)))
}

#[utoipa::path(
    post,
    path = "/api/attendant/mark-contacted",
    tag = "Attendant",
    request_body = MarkContactedPayload,
    responses(
        (status = 200, description = "Pass marked as contacted"),
        (status = 404, description = "Pass not found or not assigned to you"),
    ),
    security(("bearer" = []))
)]
pub async fn mark_contacted(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AttendantOnly>,
    Json(payload): Json<MarkContactedPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .attendant_service
        .mark_contacted(&user.0, payload.pass_id)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Pass marked as contacted" }))))
}

#[utoipa::path(
    post,
    path = "/api/attendant/update-status",
    tag = "Attendant",
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Status not settable by attendants"),
        (status = 404, description = "Pass not found or not assigned to you"),
    ),
    security(("bearer" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AttendantOnly>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .attendant_service
        .update_status(&user.0, payload.pass_id, payload.status)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Pass status updated" }))))
}

#[utoipa::path(
    post,
    path = "/api/attendant/add-note",
    tag = "Attendant",
    request_body = AddNotePayload,
    responses(
        (status = 200, description = "Note appended"),
        (status = 400, description = "Note empty or over 100 characters"),
        (status = 404, description = "Pass not found or not assigned to you"),
    ),
    security(("bearer" = []))
)]
pub async fn add_note(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AttendantOnly>,
    Json(payload): Json<AddNotePayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .attendant_service
        .add_note(&user.0, payload.pass_id, &payload.note)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Note added successfully" }))))
}

#[utoipa::path(
    post,
    path = "/api/attendant/attendance/in",
    tag = "Attendant",
    responses(
        (status = 200, description = "Clocked in", body = AttendanceRecord),
        (status = 409, description = "Already clocked in today"),
    ),
    security(("bearer" = []))
)]
pub async fn mark_attendance_in(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AttendantOnly>,
) -> Result<impl IntoResponse, AppError> {
    let record = app_state.attendant_service.clock_in(&user.0).await?;
    Ok((StatusCode::OK, Json(record)))
}

#[utoipa::path(
    post,
    path = "/api/attendant/attendance/out",
    tag = "Attendant",
    responses(
        (status = 200, description = "Clocked out, hours derived", body = AttendanceRecord),
        (status = 400, description = "Not clocked in"),
    ),
    security(("bearer" = []))
)]
pub async fn mark_attendance_out(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AttendantOnly>,
) -> Result<impl IntoResponse, AppError> {
    let record = app_state.attendant_service.clock_out(&user.0).await?;
    Ok((StatusCode::OK, Json(record)))
}
