// src/db/settings_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::settings::Settings};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reads the singleton row. The migration seeds it, but a missing row
    /// still resolves to the documented defaults rather than an error.
    pub async fn get<'e, E>(&self, executor: E) -> Result<Settings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let settings = sqlx::query_as::<_, Settings>("SELECT * FROM settings WHERE id = 1")
            .fetch_optional(executor)
            .await?;

        Ok(settings.unwrap_or(Settings {
            id: 1,
            grace_minutes_default: 30,
            max_visitors_per_attendant: None,
            updated_at: chrono::Utc::now(),
        }))
    }

    pub async fn apply_patch<'e, E>(
        &self,
        executor: E,
        grace_minutes_default: Option<i32>,
        max_visitors_per_attendant: Option<i32>,
    ) -> Result<Settings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let settings = sqlx::query_as::<_, Settings>(
            r#"
            UPDATE settings SET
                grace_minutes_default = COALESCE($1, grace_minutes_default),
                max_visitors_per_attendant = COALESCE($2, max_visitors_per_attendant),
                updated_at = now()
            WHERE id = 1
            RETURNING *
            "#,
        )
        .bind(grace_minutes_default)
        .bind(max_visitors_per_attendant)
        .fetch_one(executor)
        .await?;
        Ok(settings)
    }
}
