// src/db/aarti_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::aarti::{AartiSlot, SlotStatus},
};

#[derive(Clone)]
pub struct AartiRepository {
    pool: PgPool,
}

impl AartiRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<AartiSlot>, AppError> {
        let slots = sqlx::query_as::<_, AartiSlot>(
            "SELECT * FROM aarti_slots WHERE date = $1 ORDER BY name ASC",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    /// Insert-or-update keyed on (name, date). A fresh slot starts with
    /// zero booked capacity; an existing one keeps its bookings and only
    /// total_capacity and status change.
    pub async fn upsert_slot<'e, E>(
        &self,
        executor: E,
        name: &str,
        date: NaiveDate,
        total_capacity: i32,
        status: SlotStatus,
    ) -> Result<AartiSlot, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, AartiSlot>(
            r#"
            INSERT INTO aarti_slots (name, date, total_capacity, booked_capacity, status)
            VALUES ($1, $2, $3, 0, $4)
            ON CONFLICT (name, date)
            DO UPDATE SET total_capacity = $3, status = $4
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(date)
        .bind(total_capacity)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(slot)
    }

    /// Locks the slot row for the rest of the transaction, so the
    /// capacity check and the increment below cannot race another booking.
    pub async fn lock_slot<'e, E>(
        &self,
        executor: E,
        aarti_id: Uuid,
    ) -> Result<Option<AartiSlot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, AartiSlot>(
            "SELECT * FROM aarti_slots WHERE id = $1 FOR UPDATE",
        )
        .bind(aarti_id)
        .fetch_optional(executor)
        .await?;
        Ok(slot)
    }

    /// Increment booked_capacity. Callers hold the row lock and have
    /// already checked capacity; the table CHECK backstops the invariant.
    pub async fn increment_booked<'e, E>(
        &self,
        executor: E,
        aarti_id: Uuid,
        count: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE aarti_slots SET booked_capacity = booked_capacity + $2 WHERE id = $1")
            .bind(aarti_id)
            .bind(count)
            .execute(executor)
            .await?;
        Ok(())
    }
}
