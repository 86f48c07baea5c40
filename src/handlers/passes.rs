// src/handlers/passes.rs

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, PassIssuers, RequireRole},
    models::{
        auth::User,
        pass::{CreatePassPayload, Pass, PassWithNames, Scan},
    },
};

// ---
// Response shapes
// ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendantContact {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassCreatedResponse {
    pub message: String,
    pub pass_id: Uuid,
    pub qr_code: String,
    pub attendant: AttendantContact,
}

impl PassCreatedResponse {
    pub fn new(message: &str, pass: &Pass, attendant: &User) -> Self {
        Self {
            message: message.to_string(),
            pass_id: pass.id,
            qr_code: pass.qr_code_string.clone(),
            attendant: AttendantContact {
                name: attendant.name.clone(),
                phone: attendant.phone.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassDetailResponse {
    pub pass: PassWithNames,
    pub timeline: Vec<Scan>,
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/passes",
    tag = "Passes",
    request_body = CreatePassPayload,
    responses(
        (status = 201, description = "Pass created", body = PassCreatedResponse),
        (status = 400, description = "Validation failed or no active attendants"),
        (status = 403, description = "Insufficient permissions"),
    ),
    security(("bearer" = []))
)]
pub async fn create_pass(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<PassIssuers>,
    Json(payload): Json<CreatePassPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (pass, attendant) = app_state.pass_service.create_pass(&user.0, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(PassCreatedResponse::new(
            "Pass created successfully",
            &pass,
            &attendant,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/passes/today",
    tag = "Passes",
    responses((status = 200, description = "Today's passes, filtered by role", body = [PassWithNames])),
    security(("bearer" = []))
)]
pub async fn get_today_passes(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let passes = app_state.pass_service.today_passes(&user.0).await?;
    Ok((StatusCode::OK, Json(passes)))
}

#[utoipa::path(
    get,
    path = "/api/passes/{pass_id}",
    tag = "Passes",
    params(("pass_id" = Uuid, Path, description = "Pass id")),
    responses(
        (status = 200, description = "Pass detail with scan timeline", body = PassDetailResponse),
        (status = 404, description = "Pass not found"),
    ),
    security(("bearer" = []))
)]
pub async fn get_pass_detail(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(pass_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (pass, timeline) = app_state.pass_service.pass_detail(pass_id).await?;
    Ok((StatusCode::OK, Json(PassDetailResponse { pass, timeline })))
}

#[utoipa::path(
    get,
    path = "/api/passes/{pass_id}/ticket",
    tag = "Passes",
    params(("pass_id" = Uuid, Path, description = "Pass id")),
    responses(
        (status = 200, description = "Visitor ticket PDF", content_type = "application/pdf"),
        (status = 404, description = "Pass not found"),
    ),
    security(("bearer" = []))
)]
pub async fn get_pass_ticket(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<PassIssuers>,
    Path(pass_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let pdf = app_state.ticket_service.ticket_pdf(pass_id).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/pdf")],
        pdf,
    ))
}
