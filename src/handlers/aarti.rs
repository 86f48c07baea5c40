// src/handlers/aarti.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::passes::PassCreatedResponse,
    middleware::auth::{AuthenticatedUser, PassIssuers, RequireRole, SlotManagers},
    models::aarti::{AartiSlot, BookAartiPayload, UpsertAartiPayload},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct AartiListQuery {
    /// Defaults to today.
    pub date: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/aarti",
    tag = "Aarti",
    params(AartiListQuery),
    responses((status = 200, description = "Slots for the date", body = [AartiSlot])),
    security(("bearer" = []))
)]
pub async fn get_aarti_slots(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<AartiListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let slots = app_state.aarti_service.list_slots(query.date).await?;
    Ok((StatusCode::OK, Json(slots)))
}

#[utoipa::path(
    post,
    path = "/api/aarti/book",
    tag = "Aarti",
    request_body = BookAartiPayload,
    responses(
        (status = 201, description = "Aarti booked, pass created", body = PassCreatedResponse),
        (status = 404, description = "Slot not found"),
        (status = 409, description = "Slot closed or capacity exceeded"),
    ),
    security(("bearer" = []))
)]
pub async fn book_aarti(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<PassIssuers>,
    Json(payload): Json<BookAartiPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (pass, attendant) = app_state
        .pass_service
        .create_aarti_pass(&user.0, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PassCreatedResponse::new(
            "Aarti booked successfully",
            &pass,
            &attendant,
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/api/aarti/update-capacity",
    tag = "Aarti",
    request_body = UpsertAartiPayload,
    responses(
        (status = 200, description = "Slot created or updated", body = AartiSlot),
        (status = 403, description = "Insufficient permissions"),
    ),
    security(("bearer" = []))
)]
pub async fn update_aarti_capacity(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<SlotManagers>,
    Json(payload): Json<UpsertAartiPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let slot = app_state.aarti_service.upsert_slot(&user.0, payload).await?;
    Ok((StatusCode::OK, Json(slot)))
}
