// src/db/pass_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres, types::Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::pass::{
        AttendantNote, IssueType, NewPass, Pass, PassStatus, PassWithNames, Scan, ScanSource,
        ScanStage,
    },
};

const SELECT_WITH_NAMES: &str = r#"
    SELECT p.*,
           t.name  AS trustee_name,
           a.name  AS attendant_name,
           a.phone AS attendant_phone
    FROM passes p
    LEFT JOIN users t ON p.trustee_id = t.id
    LEFT JOIN users a ON p.assigned_attendant_id = a.id
"#;

#[derive(Clone)]
pub struct PassRepository {
    pool: PgPool,
}

impl PassRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Writes (transactional, executor-generic)
    // ---

    pub async fn insert_pass<'e, E>(&self, executor: E, new: &NewPass) -> Result<Pass, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pass = sqlx::query_as::<_, Pass>(
            r#"
            INSERT INTO passes (
                trustee_id, assistant_id, visitor_name, visitor_phone, visitor_email,
                total_people, darshan_type, vastra_count, vastra_names, date, time,
                grace_minutes, assigned_attendant_id, qr_code_string, trustee_note
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(new.trustee_id)
        .bind(new.assistant_id)
        .bind(&new.visitor_name)
        .bind(&new.visitor_phone)
        .bind(new.visitor_email.as_deref())
        .bind(new.total_people)
        .bind(&new.darshan_type)
        .bind(new.vastra_count)
        .bind(new.vastra_names.clone().map(Json))
        .bind(new.date)
        .bind(new.time)
        .bind(new.grace_minutes)
        .bind(new.assigned_attendant_id)
        .bind(&new.qr_code_string)
        .bind(new.trustee_note.as_deref())
        .fetch_one(executor)
        .await?;
        Ok(pass)
    }

    /// Status update guarded by ownership: one statement, so "does not
    /// exist" and "not yours" are indistinguishable (zero rows affected).
    pub async fn update_status_owned<'e, E>(
        &self,
        executor: E,
        pass_id: Uuid,
        attendant_id: Uuid,
        status: PassStatus,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE passes SET status = $3, updated_at = now()
            WHERE id = $1 AND assigned_attendant_id = $2
            "#,
        )
        .bind(pass_id)
        .bind(attendant_id)
        .bind(status)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Unguarded status update (scanner/issue paths).
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        pass_id: Uuid,
        status: PassStatus,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE passes SET status = $2, updated_at = now() WHERE id = $1")
            .bind(pass_id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Appends to the scan timeline. Duplicates per stage are allowed;
    /// the timeline is a log, not a set.
    pub async fn insert_scan<'e, E>(
        &self,
        executor: E,
        pass_id: Uuid,
        stage: ScanStage,
        source: ScanSource,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO scans (pass_id, stage, source) VALUES ($1, $2, $3)")
            .bind(pass_id)
            .bind(stage)
            .bind(source)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Reads the note sequence under the ownership predicate, locking the
    /// row so the read-modify-write in the service cannot lose notes.
    pub async fn notes_for_update<'e, E>(
        &self,
        executor: E,
        pass_id: Uuid,
        attendant_id: Uuid,
    ) -> Result<Option<Vec<AttendantNote>>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let notes: Option<Json<Vec<AttendantNote>>> = sqlx::query_scalar(
            r#"
            SELECT attendant_notes FROM passes
            WHERE id = $1 AND assigned_attendant_id = $2
            FOR UPDATE
            "#,
        )
        .bind(pass_id)
        .bind(attendant_id)
        .fetch_optional(executor)
        .await?;
        Ok(notes.map(|Json(n)| n))
    }

    pub async fn set_notes<'e, E>(
        &self,
        executor: E,
        pass_id: Uuid,
        notes: &[AttendantNote],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE passes SET attendant_notes = $2, updated_at = now() WHERE id = $1")
            .bind(pass_id)
            .bind(Json(notes))
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert_issue<'e, E>(
        &self,
        executor: E,
        pass_id: Uuid,
        reported_by_user_id: Uuid,
        issue_type: IssueType,
        description: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO issues (pass_id, reported_by_user_id, issue_type, description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(pass_id)
        .bind(reported_by_user_id)
        .bind(issue_type)
        .bind(description)
        .execute(executor)
        .await?;
        Ok(())
    }

    // ---
    // Reads
    // ---

    pub async fn today_for_trustee(
        &self,
        trustee_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<PassWithNames>, AppError> {
        let sql = format!("{SELECT_WITH_NAMES} WHERE p.trustee_id = $1 AND p.date = $2 ORDER BY p.time ASC");
        let passes = sqlx::query_as::<_, PassWithNames>(&sql)
            .bind(trustee_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(passes)
    }

    pub async fn today_for_attendant(
        &self,
        attendant_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<PassWithNames>, AppError> {
        let sql = format!(
            "{SELECT_WITH_NAMES} WHERE p.assigned_attendant_id = $1 AND p.date = $2 ORDER BY p.time ASC"
        );
        let passes = sqlx::query_as::<_, PassWithNames>(&sql)
            .bind(attendant_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(passes)
    }

    pub async fn today_all(&self, date: NaiveDate) -> Result<Vec<PassWithNames>, AppError> {
        let sql = format!("{SELECT_WITH_NAMES} WHERE p.date = $1 ORDER BY p.time ASC");
        let passes = sqlx::query_as::<_, PassWithNames>(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(passes)
    }

    pub async fn upcoming_for_attendant(
        &self,
        attendant_id: Uuid,
        after: NaiveDate,
    ) -> Result<Vec<PassWithNames>, AppError> {
        let sql = format!(
            "{SELECT_WITH_NAMES} WHERE p.assigned_attendant_id = $1 AND p.date > $2 \
             ORDER BY p.date ASC, p.time ASC LIMIT 20"
        );
        let passes = sqlx::query_as::<_, PassWithNames>(&sql)
            .bind(attendant_id)
            .bind(after)
            .fetch_all(&self.pool)
            .await?;
        Ok(passes)
    }

    pub async fn find_detail(&self, pass_id: Uuid) -> Result<Option<PassWithNames>, AppError> {
        let sql = format!("{SELECT_WITH_NAMES} WHERE p.id = $1");
        let pass = sqlx::query_as::<_, PassWithNames>(&sql)
            .bind(pass_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pass)
    }

    /// The QR string is the sole external lookup key for gate checks.
    pub async fn find_by_qr(&self, qr_code_string: &str) -> Result<Option<PassWithNames>, AppError> {
        let sql = format!("{SELECT_WITH_NAMES} WHERE p.qr_code_string = $1");
        let pass = sqlx::query_as::<_, PassWithNames>(&sql)
            .bind(qr_code_string)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pass)
    }

    pub async fn list_scans(&self, pass_id: Uuid) -> Result<Vec<Scan>, AppError> {
        let scans = sqlx::query_as::<_, Scan>(
            "SELECT * FROM scans WHERE pass_id = $1 ORDER BY created_at ASC",
        )
        .bind(pass_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(scans)
    }
}
