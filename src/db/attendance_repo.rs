// src/db/attendance_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::attendance::{AttendanceRecord, AttendanceWithName},
};

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Locks today's record so clock-out cannot race a second request
    /// from the same attendant.
    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        attendant_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendant_attendance WHERE attendant_id = $1 AND date = $2 FOR UPDATE",
        )
        .bind(attendant_id)
        .bind(date)
        .fetch_optional(executor)
        .await?;
        Ok(record)
    }

    /// Upsert on (attendant_id, date), stamping time_in. The statement
    /// guards itself: once time_in is recorded, the conflict arm matches
    /// zero rows and returns None instead of overwriting it, so two
    /// concurrent first clock-ins cannot both succeed.
    pub async fn clock_in<'e, E>(
        &self,
        executor: E,
        attendant_id: Uuid,
        date: NaiveDate,
        time_in: DateTime<Utc>,
    ) -> Result<Option<AttendanceRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO attendant_attendance (attendant_id, date, time_in)
            VALUES ($1, $2, $3)
            ON CONFLICT (attendant_id, date)
            DO UPDATE SET time_in = EXCLUDED.time_in
            WHERE attendant_attendance.time_in IS NULL
            RETURNING *
            "#,
        )
        .bind(attendant_id)
        .bind(date)
        .bind(time_in)
        .fetch_optional(executor)
        .await?;
        Ok(record)
    }

    pub async fn clock_out<'e, E>(
        &self,
        executor: E,
        record_id: Uuid,
        time_out: DateTime<Utc>,
        total_hours: Decimal,
    ) -> Result<AttendanceRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            UPDATE attendant_attendance
            SET time_out = $2, total_hours = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(record_id)
        .bind(time_out)
        .bind(total_hours)
        .fetch_one(executor)
        .await?;
        Ok(record)
    }

    /// Admin listing with optional date and attendant filters. The filter
    /// surface is fixed; absent filters collapse via IS NULL.
    pub async fn list(
        &self,
        date: Option<NaiveDate>,
        attendant_id: Option<Uuid>,
    ) -> Result<Vec<AttendanceWithName>, AppError> {
        let records = sqlx::query_as::<_, AttendanceWithName>(
            r#"
            SELECT aa.*, u.name AS attendant_name, u.phone AS attendant_phone
            FROM attendant_attendance aa
            JOIN users u ON aa.attendant_id = u.id
            WHERE ($1::date IS NULL OR aa.date = $1)
              AND ($2::uuid IS NULL OR aa.attendant_id = $2)
            ORDER BY aa.date DESC, aa.time_in DESC
            "#,
        )
        .bind(date)
        .bind(attendant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
