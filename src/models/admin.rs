// src/models/admin.rs
//
// Admin-facing payloads and report rows. Partial updates go through
// explicit patch structs applied with fixed COALESCE updates, so the
// mutable surface of each entity is statically enumerable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::Role;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "Phone is required."))]
    pub phone: String,
    #[validate(email(message = "Invalid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
    pub role: Role,
    pub parent_trustee_id: Option<Uuid>,
}

/// Partial update for a user. Absent fields are left untouched; absent and
/// null are not distinguished, so a nullable field (`email`) cannot be
/// cleared back to NULL through a patch.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[validate(length(min = 1, message = "Name cannot be empty."))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address."))]
    pub email: Option<String>,
    pub is_active: Option<bool>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.is_active.is_none()
            && self.password.is_none()
    }
}

/// Partial update for the settings singleton. As with [`UserPatch`],
/// `max_visitors_per_attendant` cannot be cleared back to NULL.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[validate(range(min = 0, message = "Grace minutes cannot be negative."))]
    pub grace_minutes_default: Option<i32>,
    #[validate(range(min = 1, message = "Must allow at least one visitor."))]
    pub max_visitors_per_attendant: Option<i32>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.grace_minutes_default.is_none() && self.max_visitors_per_attendant.is_none()
    }
}

/// Read-only per-attendant rollup: pass counts by outcome plus average
/// daily hours. Attendants without passes or attendance report zeros/NULL.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendantPerformance {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub total_passes: i64,
    pub completed_passes: i64,
    pub issue_passes: i64,
    #[schema(value_type = Option<f64>)]
    pub avg_hours_per_day: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn empty_patches_are_detected() {
        assert!(UserPatch::default().is_empty());
        assert!(SettingsPatch::default().is_empty());

        let patch = UserPatch {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        let patch = SettingsPatch {
            grace_minutes_default: Some(45),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn user_patch_validates_present_fields_only() {
        let ok = UserPatch {
            name: Some("Ramesh".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let short_password = UserPatch {
            password: Some("abc".into()),
            ..Default::default()
        };
        assert!(short_password.validate().is_err());

        // Absent fields are not validated at all.
        assert!(UserPatch::default().validate().is_ok());
    }

    #[test]
    fn settings_patch_rejects_negative_grace() {
        let patch = SettingsPatch {
            grace_minutes_default: Some(-5),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
