// src/services/scanner_service.rs
//
// Gate-side operations. Scanners act by pass identity, not ownership:
// any scanner (or admin) may move any pass. There is deliberately no
// guard against moving a status backward; the scan log keeps the full
// history either way.

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LogRepository, PassRepository},
    models::{
        auth::User,
        pass::{EntryDenial, IssueType, PassStatus, PassWithNames, ScanSource, ScanStage},
    },
};

#[derive(Clone)]
pub struct ScannerService {
    pass_repo: PassRepository,
    log_repo: LogRepository,
    pool: PgPool,
}

impl ScannerService {
    pub fn new(pass_repo: PassRepository, log_repo: LogRepository, pool: PgPool) -> Self {
        Self {
            pass_repo,
            log_repo,
            pool,
        }
    }

    /// Read-only pre-check before gate decisioning: resolves the QR string
    /// and refuses cancelled, expired and already-completed passes.
    pub async fn validate_for_entry(
        &self,
        qr_code_string: &str,
    ) -> Result<PassWithNames, AppError> {
        let pass = self
            .pass_repo
            .find_by_qr(qr_code_string)
            .await?
            .ok_or(AppError::InvalidQrCode)?;

        match pass.pass.status.entry_denial() {
            Some(EntryDenial::Invalid(status)) => Err(AppError::PassInvalid(status)),
            Some(EntryDenial::AlreadyCompleted) => Err(AppError::AlreadyCompleted),
            None => Ok(pass),
        }
    }

    /// Records a gate stage: maps the stage onto the pass status, appends
    /// the scan row, audit-logs - one transaction.
    pub async fn update_status(
        &self,
        scanner: &User,
        pass_id: Uuid,
        stage: ScanStage,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = self
            .pass_repo
            .update_status(&mut *tx, pass_id, stage.as_status())
            .await?;
        if !updated {
            return Err(AppError::PassNotFound);
        }

        self.pass_repo
            .insert_scan(&mut *tx, pass_id, stage, ScanSource::Scanner)
            .await?;

        self.log_repo
            .record(
                &mut *tx,
                scanner.id,
                "SCANNER_UPDATE",
                "PASS",
                Some(pass_id),
                json!({ "stage": stage }),
            )
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Files an issue and forces the pass into ISSUE, overriding whatever
    /// state it was in - including COMPLETED.
    pub async fn report_issue(
        &self,
        reporter: &User,
        pass_id: Uuid,
        issue_type: IssueType,
        description: &str,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = self
            .pass_repo
            .update_status(&mut *tx, pass_id, PassStatus::Issue)
            .await?;
        if !updated {
            return Err(AppError::PassNotFound);
        }

        self.pass_repo
            .insert_issue(&mut *tx, pass_id, reporter.id, issue_type, description)
            .await?;

        self.log_repo
            .record(
                &mut *tx,
                reporter.id,
                "REPORT_ISSUE",
                "PASS",
                Some(pass_id),
                json!({ "issueType": issue_type, "description": description }),
            )
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
