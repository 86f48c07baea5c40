// src/db/log_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;

// Append-only audit trail. record() always runs on the caller's executor:
// inside a mutating transaction the entry commits or rolls back with the
// operation it documents, never on its own.
#[derive(Clone)]
pub struct LogRepository;

impl LogRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn record<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
        payload: serde_json::Value,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO logs (user_id, action, entity_type, entity_id, payload)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(payload)
        .execute(executor)
        .await?;
        Ok(())
    }
}
