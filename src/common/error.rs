// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::pass::PassStatus;

// Application-wide error type. Handlers return Result<_, AppError> and
// axum turns the error into a JSON response via IntoResponse below.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientRole,

    #[error("User not found")]
    UserNotFound,

    #[error("Phone number already exists")]
    PhoneAlreadyExists,

    // Deliberately conflated: a pass that does not exist and a pass
    // assigned to someone else produce the same error, so an attendant
    // cannot probe assignments.
    #[error("Pass not found or not assigned to you")]
    PassNotFoundOrNotYours,

    #[error("Pass not found")]
    PassNotFound,

    #[error("Invalid QR code")]
    InvalidQrCode,

    #[error("Pass is {0:?}")]
    PassInvalid(PassStatus),

    #[error("Pass already completed")]
    AlreadyCompleted,

    #[error("Aarti slot not found")]
    AartiNotFound,

    #[error("Aarti slot is closed")]
    AartiClosed,

    #[error("Only {remaining} slots available")]
    CapacityExceeded { remaining: i32 },

    #[error("No active attendants available")]
    NoAttendantAvailable,

    #[error("Already marked in for today")]
    AlreadyClockedIn,

    #[error("Please mark attendance IN first")]
    NotClockedIn,

    #[error("Invalid status")]
    InvalidStatus,

    #[error("Note must be non-empty and at most 100 characters")]
    InvalidNote,

    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("PDF error: {0}")]
    PdfError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Return every validation detail, keyed by field.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid phone or password.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Authentication token is missing or invalid.".to_string(),
            ),
            AppError::InsufficientRole => {
                (StatusCode::FORBIDDEN, "Insufficient permissions.".to_string())
            }

            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found.".to_string()),
            AppError::PassNotFound => (StatusCode::NOT_FOUND, "Pass not found.".to_string()),
            AppError::PassNotFoundOrNotYours => (
                StatusCode::NOT_FOUND,
                "Pass not found or not assigned to you.".to_string(),
            ),
            AppError::InvalidQrCode => (StatusCode::NOT_FOUND, "Invalid QR code.".to_string()),
            AppError::AartiNotFound => {
                (StatusCode::NOT_FOUND, "Aarti slot not found.".to_string())
            }

            AppError::PhoneAlreadyExists => (
                StatusCode::CONFLICT,
                "Phone number already exists.".to_string(),
            ),
            AppError::AartiClosed => (StatusCode::CONFLICT, "Aarti slot is closed.".to_string()),
            AppError::CapacityExceeded { remaining } => (
                StatusCode::CONFLICT,
                format!("Only {remaining} slots available."),
            ),
            AppError::AlreadyClockedIn => (
                StatusCode::CONFLICT,
                "Already marked in for today.".to_string(),
            ),

            AppError::PassInvalid(status) => {
                let tag = serde_json::to_value(status)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_owned))
                    .unwrap_or_else(|| format!("{status:?}"));
                (StatusCode::BAD_REQUEST, format!("Pass is {tag}."))
            }
            AppError::AlreadyCompleted => (
                StatusCode::BAD_REQUEST,
                "Pass already completed.".to_string(),
            ),
            AppError::NoAttendantAvailable => (
                StatusCode::BAD_REQUEST,
                "No active attendants available.".to_string(),
            ),
            AppError::NotClockedIn => (
                StatusCode::BAD_REQUEST,
                "Please mark attendance IN first.".to_string(),
            ),
            AppError::InvalidStatus => (StatusCode::BAD_REQUEST, "Invalid status.".to_string()),
            AppError::InvalidNote => (
                StatusCode::BAD_REQUEST,
                "Note must be non-empty and at most 100 characters.".to_string(),
            ),
            AppError::NoFieldsToUpdate => {
                (StatusCode::BAD_REQUEST, "No fields to update.".to_string())
            }

            // Everything else is a 500: log the detailed message, answer
            // with a generic one.
            ref e => {
                tracing::error!("Internal server error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::AlreadyClockedIn, StatusCode::CONFLICT)]
    #[case(AppError::NotClockedIn, StatusCode::BAD_REQUEST)]
    #[case(AppError::PhoneAlreadyExists, StatusCode::CONFLICT)]
    #[case(AppError::CapacityExceeded { remaining: 2 }, StatusCode::CONFLICT)]
    #[case(AppError::PassNotFoundOrNotYours, StatusCode::NOT_FOUND)]
    #[case(AppError::InsufficientRole, StatusCode::FORBIDDEN)]
    #[case(AppError::InvalidCredentials, StatusCode::UNAUTHORIZED)]
    #[case(AppError::NoAttendantAvailable, StatusCode::BAD_REQUEST)]
    fn refusals_map_to_expected_statuses(#[case] err: AppError, #[case] expected: StatusCode) {
        assert_eq!(err.into_response().status(), expected);
    }
}
