// src/db/reports_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::admin::AttendantPerformance};

// Read-only rollups for the admin dashboard.
#[derive(Clone)]
pub struct ReportsRepository {
    pool: PgPool,
}

impl ReportsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Per-attendant pass counts and average worked hours. Correlated
    /// subselects keep the pass and attendance aggregates independent;
    /// a flat double JOIN would cross-multiply the rows.
    pub async fn attendant_performance(&self) -> Result<Vec<AttendantPerformance>, AppError> {
        let rows = sqlx::query_as::<_, AttendantPerformance>(
            r#"
            SELECT
                u.id,
                u.name,
                u.phone,
                (SELECT COUNT(*) FROM passes p
                  WHERE p.assigned_attendant_id = u.id)          AS total_passes,
                (SELECT COUNT(*) FROM passes p
                  WHERE p.assigned_attendant_id = u.id
                    AND p.status = 'COMPLETED')                  AS completed_passes,
                (SELECT COUNT(*) FROM passes p
                  WHERE p.assigned_attendant_id = u.id
                    AND p.status = 'ISSUE')                      AS issue_passes,
                (SELECT AVG(aa.total_hours) FROM attendant_attendance aa
                  WHERE aa.attendant_id = u.id)                  AS avg_hours_per_day
            FROM users u
            WHERE u.role = 'ATTENDANT' AND u.is_active = TRUE
            ORDER BY u.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
