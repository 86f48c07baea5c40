// src/handlers/scanner.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, GateCrew, RequireRole},
    models::pass::{IssueType, PassWithNames, ScanStage},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanQrPayload {
    pub qr_code_string: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScannerUpdatePayload {
    pub pass_id: Uuid,
    pub stage: ScanStage,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportIssuePayload {
    pub pass_id: Uuid,
    pub issue_type: IssueType,
    pub description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/scanner/scan-qr",
    tag = "Scanner",
    request_body = ScanQrPayload,
    responses(
        (status = 200, description = "Pass is valid for entry", body = PassWithNames),
        (status = 400, description = "Pass cancelled, expired or already completed"),
        (status = 404, description = "Unknown QR code"),
    ),
    security(("bearer" = []))
)]
pub async fn scan_qr(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<GateCrew>,
    Json(payload): Json<ScanQrPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pass = app_state
        .scanner_service
        .validate_for_entry(&payload.qr_code_string)
        .await?;
    Ok((StatusCode::OK, Json(pass)))
}

#[utoipa::path(
    post,
    path = "/api/scanner/update-status",
    tag = "Scanner",
    request_body = ScannerUpdatePayload,
    responses(
        (status = 200, description = "Gate stage recorded"),
        (status = 404, description = "Pass not found"),
    ),
    security(("bearer" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<GateCrew>,
    Json(payload): Json<ScannerUpdatePayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .scanner_service
        .update_status(&user.0, payload.pass_id, payload.stage)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Pass status updated" }))))
}

#[utoipa::path(
    post,
    path = "/api/scanner/issue",
    tag = "Scanner",
    request_body = ReportIssuePayload,
    responses(
        (status = 201, description = "Issue recorded, pass moved to ISSUE"),
        (status = 404, description = "Pass not found"),
    ),
    security(("bearer" = []))
)]
pub async fn report_issue(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<GateCrew>,
    Json(payload): Json<ReportIssuePayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .scanner_service
        .report_issue(
            &user.0,
            payload.pass_id,
            payload.issue_type,
            payload.description.as_deref().unwrap_or(""),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Issue reported" }))))
}
