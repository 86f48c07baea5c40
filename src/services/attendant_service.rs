// src/services/attendant_service.rs
//
// Everything an attendant does against their own assignments: status
// progression, notes and the daily clock-in/clock-out. Every ownership
// check is conflated with "not found" so attendants cannot probe passes
// assigned to someone else.

use chrono::{Local, Utc};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AttendanceRepository, LogRepository, PassRepository},
    models::{
        attendance::{AttendanceRecord, worked_hours},
        auth::User,
        pass::{AttendantNote, PassStatus, PassWithNames, ScanSource, validate_note},
    },
};

#[derive(Clone)]
pub struct AttendantService {
    pass_repo: PassRepository,
    attendance_repo: AttendanceRepository,
    log_repo: LogRepository,
    pool: PgPool,
}

impl AttendantService {
    pub fn new(
        pass_repo: PassRepository,
        attendance_repo: AttendanceRepository,
        log_repo: LogRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            pass_repo,
            attendance_repo,
            log_repo,
            pool,
        }
    }

    pub async fn assigned_today(&self, attendant: &User) -> Result<Vec<PassWithNames>, AppError> {
        let today = Local::now().date_naive();
        self.pass_repo.today_for_attendant(attendant.id, today).await
    }

    pub async fn upcoming(&self, attendant: &User) -> Result<Vec<PassWithNames>, AppError> {
        let today = Local::now().date_naive();
        self.pass_repo.upcoming_for_attendant(attendant.id, today).await
    }

    pub async fn mark_contacted(&self, attendant: &User, pass_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = self
            .pass_repo
            .update_status_owned(&mut *tx, pass_id, attendant.id, PassStatus::Contacted)
            .await?;
        if !updated {
            return Err(AppError::PassNotFoundOrNotYours);
        }

        self.log_repo
            .record(&mut *tx, attendant.id, "MARK_CONTACTED", "PASS", Some(pass_id), json!({}))
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Moves an owned pass to REACHED, AT_GATE, COMPLETED or ISSUE. The
    /// first three also append a scan row; ISSUE records no scan.
    pub async fn update_status(
        &self,
        attendant: &User,
        pass_id: Uuid,
        status: PassStatus,
    ) -> Result<(), AppError> {
        if !status.attendant_settable() {
            return Err(AppError::InvalidStatus);
        }

        let mut tx = self.pool.begin().await?;

        let updated = self
            .pass_repo
            .update_status_owned(&mut *tx, pass_id, attendant.id, status)
            .await?;
        if !updated {
            return Err(AppError::PassNotFoundOrNotYours);
        }

        if let Some(stage) = status.scan_stage() {
            self.pass_repo
                .insert_scan(&mut *tx, pass_id, stage, ScanSource::Attendant)
                .await?;
        }

        self.log_repo
            .record(
                &mut *tx,
                attendant.id,
                "UPDATE_STATUS",
                "PASS",
                Some(pass_id),
                json!({ "status": status }),
            )
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Appends a note to the pass's ordered note sequence. The sequence is
    /// a single JSONB column, so the append is a read-modify-write under a
    /// row lock.
    pub async fn add_note(
        &self,
        attendant: &User,
        pass_id: Uuid,
        note: &str,
    ) -> Result<(), AppError> {
        let note = validate_note(note).ok_or(AppError::InvalidNote)?;

        let mut tx = self.pool.begin().await?;

        let mut notes = self
            .pass_repo
            .notes_for_update(&mut *tx, pass_id, attendant.id)
            .await?
            .ok_or(AppError::PassNotFoundOrNotYours)?;

        notes.push(AttendantNote {
            user_id: attendant.id,
            note: note.to_string(),
            timestamp: Utc::now(),
        });
        self.pass_repo.set_notes(&mut *tx, pass_id, &notes).await?;

        self.log_repo
            .record(
                &mut *tx,
                attendant.id,
                "ADD_NOTE",
                "PASS",
                Some(pass_id),
                json!({ "note": note }),
            )
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Clock in for today. One record per (attendant, day); a second
    /// clock-in is refused, not overwritten. The refusal lives in the
    /// upsert itself; a read-then-insert check would leave a window where
    /// two concurrent first clock-ins both pass.
    pub async fn clock_in(&self, attendant: &User) -> Result<AttendanceRecord, AppError> {
        let today = Local::now().date_naive();
        let mut tx = self.pool.begin().await?;

        let record = self
            .attendance_repo
            .clock_in(&mut *tx, attendant.id, today, Utc::now())
            .await?
            .ok_or(AppError::AlreadyClockedIn)?;

        self.log_repo
            .record(
                &mut *tx,
                attendant.id,
                "CLOCK_IN",
                "ATTENDANCE",
                Some(record.id),
                json!({ "date": today }),
            )
            .await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Clock out: derives total hours from the recorded clock-in, once.
    pub async fn clock_out(&self, attendant: &User) -> Result<AttendanceRecord, AppError> {
        let today = Local::now().date_naive();
        let mut tx = self.pool.begin().await?;

        let record = self
            .attendance_repo
            .find_for_update(&mut *tx, attendant.id, today)
            .await?
            .ok_or(AppError::NotClockedIn)?;
        let time_in = record.time_in.ok_or(AppError::NotClockedIn)?;

        let time_out = Utc::now();
        let record = self
            .attendance_repo
            .clock_out(&mut *tx, record.id, time_out, worked_hours(time_in, time_out))
            .await?;

        self.log_repo
            .record(
                &mut *tx,
                attendant.id,
                "CLOCK_OUT",
                "ATTENDANCE",
                Some(record.id),
                json!({ "date": today, "totalHours": record.total_hours }),
            )
            .await?;

        tx.commit().await?;
        Ok(record)
    }
}
