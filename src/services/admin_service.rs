// src/services/admin_service.rs

use bcrypt::hash;
use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        AttendanceRepository, LogRepository, ReportsRepository, SettingsRepository, UserRepository,
    },
    models::{
        admin::{AttendantPerformance, CreateUserPayload, SettingsPatch, UserPatch},
        attendance::AttendanceWithName,
        auth::User,
        settings::Settings,
    },
};

#[derive(Clone)]
pub struct AdminService {
    user_repo: UserRepository,
    attendance_repo: AttendanceRepository,
    settings_repo: SettingsRepository,
    reports_repo: ReportsRepository,
    log_repo: LogRepository,
    pool: PgPool,
}

impl AdminService {
    pub fn new(
        user_repo: UserRepository,
        attendance_repo: AttendanceRepository,
        settings_repo: SettingsRepository,
        reports_repo: ReportsRepository,
        log_repo: LogRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            attendance_repo,
            settings_repo,
            reports_repo,
            log_repo,
            pool,
        }
    }

    pub async fn create_user(
        &self,
        admin: &User,
        payload: CreateUserPayload,
    ) -> Result<User, AppError> {
        // Hashing happens before the transaction; it touches no state.
        let password = payload.password.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("hashing task failed: {}", e))??;

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                &payload.name,
                &payload.phone,
                payload.email.as_deref(),
                &password_hash,
                payload.role,
                payload.parent_trustee_id,
            )
            .await?;

        self.log_repo
            .record(
                &mut *tx,
                admin.id,
                "CREATE_USER",
                "USER",
                Some(user.id),
                json!({ "name": payload.name, "phone": payload.phone, "role": payload.role }),
            )
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Applies a user patch. The updatable surface is the fixed field set
    /// of `UserPatch`; an all-absent patch is refused.
    pub async fn update_user(
        &self,
        admin: &User,
        user_id: Uuid,
        patch: UserPatch,
    ) -> Result<User, AppError> {
        if patch.is_empty() {
            return Err(AppError::NoFieldsToUpdate);
        }

        let password_hash = match patch.password.clone() {
            Some(password) => Some(
                tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                    .await
                    .map_err(|e| anyhow::anyhow!("hashing task failed: {}", e))??,
            ),
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .apply_patch(
                &mut *tx,
                user_id,
                patch.name.as_deref(),
                patch.email.as_deref(),
                patch.is_active,
                password_hash.as_deref(),
            )
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.log_repo
            .record(
                &mut *tx,
                admin.id,
                "UPDATE_USER",
                "USER",
                Some(user_id),
                // The password never reaches the audit log, hashed or not.
                json!({
                    "name": patch.name,
                    "email": patch.email,
                    "isActive": patch.is_active,
                    "passwordChanged": password_hash.is_some(),
                }),
            )
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn list_attendance(
        &self,
        date: Option<NaiveDate>,
        attendant_id: Option<Uuid>,
    ) -> Result<Vec<AttendanceWithName>, AppError> {
        self.attendance_repo.list(date, attendant_id).await
    }

    pub async fn performance(&self) -> Result<Vec<AttendantPerformance>, AppError> {
        self.reports_repo.attendant_performance().await
    }

    pub async fn update_settings(
        &self,
        admin: &User,
        patch: SettingsPatch,
    ) -> Result<Settings, AppError> {
        if patch.is_empty() {
            return Err(AppError::NoFieldsToUpdate);
        }

        let mut tx = self.pool.begin().await?;

        let settings = self
            .settings_repo
            .apply_patch(
                &mut *tx,
                patch.grace_minutes_default,
                patch.max_visitors_per_attendant,
            )
            .await?;

        self.log_repo
            .record(
                &mut *tx,
                admin.id,
                "UPDATE_SETTINGS",
                "SETTINGS",
                None,
                json!({
                    "graceMinutesDefault": patch.grace_minutes_default,
                    "maxVisitorsPerAttendant": patch.max_visitors_per_attendant,
                }),
            )
            .await?;

        tx.commit().await?;
        Ok(settings)
    }
}
