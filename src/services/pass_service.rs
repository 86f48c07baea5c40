// src/services/pass_service.rs
//
// The pass lifecycle engine's issuance side: direct passes and aarti
// bookings. Each creation is one transaction covering the settings
// snapshot, the attendant assignment, the pass insert, any capacity
// reservation, and the audit log entry.

use chrono::{Local, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AartiRepository, LogRepository, PassRepository, SettingsRepository, UserRepository},
    models::{
        aarti::{BookAartiPayload, BookingRefusal},
        auth::{Role, User},
        pass::{CreatePassPayload, NewPass, Pass, PassWithNames, Scan},
    },
};

/// Globally unique external lookup key printed into the QR code.
pub fn generate_qr_string() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("SV-{}", hex[..12].to_uppercase())
}

#[derive(Clone)]
pub struct PassService {
    pass_repo: PassRepository,
    user_repo: UserRepository,
    aarti_repo: AartiRepository,
    settings_repo: SettingsRepository,
    log_repo: LogRepository,
    pool: PgPool,
}

impl PassService {
    pub fn new(
        pass_repo: PassRepository,
        user_repo: UserRepository,
        aarti_repo: AartiRepository,
        settings_repo: SettingsRepository,
        log_repo: LogRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            pass_repo,
            user_repo,
            aarti_repo,
            settings_repo,
            log_repo,
            pool,
        }
    }

    /// Creates a direct pass. Returns the pass and the assigned attendant
    /// so the caller can hand the visitor a contact.
    pub async fn create_pass(
        &self,
        issuer: &User,
        payload: CreatePassPayload,
    ) -> Result<(Pass, User), AppError> {
        let mut tx = self.pool.begin().await?;

        // Grace minutes are snapshotted into the pass here; later settings
        // changes do not touch existing passes.
        let settings = self.settings_repo.get(&mut *tx).await?;

        let today = Local::now().date_naive();
        let attendant = self
            .user_repo
            .select_least_loaded_attendant(&mut *tx, today)
            .await?
            .ok_or(AppError::NoAttendantAvailable)?;

        let new_pass = NewPass {
            trustee_id: issuer.id,
            assistant_id: payload.assistant_id,
            visitor_name: payload.visitor_name.clone(),
            visitor_phone: payload.visitor_phone.clone(),
            visitor_email: payload.visitor_email.clone(),
            total_people: payload.total_people,
            darshan_type: payload.darshan_type.clone(),
            vastra_count: payload.vastra_count,
            vastra_names: payload.vastra_names.clone(),
            date: payload.date,
            time: payload.time,
            grace_minutes: settings.grace_minutes_default,
            assigned_attendant_id: attendant.id,
            qr_code_string: generate_qr_string(),
            trustee_note: payload.trustee_note.clone(),
        };

        let pass = self.pass_repo.insert_pass(&mut *tx, &new_pass).await?;

        self.log_repo
            .record(
                &mut *tx,
                issuer.id,
                "CREATE_PASS",
                "PASS",
                Some(pass.id),
                serde_json::to_value(&payload)
                    .map_err(|e| AppError::InternalServerError(e.into()))?,
            )
            .await?;

        tx.commit().await?;
        Ok((pass, attendant))
    }

    /// Books seats in an aarti slot and creates the backing pass. The slot
    /// row is locked first, so the capacity check and the increment cannot
    /// race a concurrent booking; any later failure rolls the reservation
    /// back with everything else.
    pub async fn create_aarti_pass(
        &self,
        issuer: &User,
        payload: BookAartiPayload,
    ) -> Result<(Pass, User), AppError> {
        let mut tx = self.pool.begin().await?;

        let slot = self
            .aarti_repo
            .lock_slot(&mut *tx, payload.aarti_id)
            .await?
            .ok_or(AppError::AartiNotFound)?;

        slot.check_bookable(payload.count).map_err(|refusal| match refusal {
            BookingRefusal::Closed => AppError::AartiClosed,
            BookingRefusal::CapacityExceeded { remaining } => {
                AppError::CapacityExceeded { remaining }
            }
        })?;

        let settings = self.settings_repo.get(&mut *tx).await?;

        let today = Local::now().date_naive();
        let attendant = self
            .user_repo
            .select_least_loaded_attendant(&mut *tx, today)
            .await?
            .ok_or(AppError::NoAttendantAvailable)?;

        let new_pass = NewPass {
            trustee_id: issuer.id,
            assistant_id: None,
            visitor_name: payload.visitor_name.clone(),
            visitor_phone: payload.visitor_phone.clone(),
            visitor_email: payload.visitor_email.clone(),
            total_people: payload.count,
            darshan_type: "NORMAL".to_string(),
            vastra_count: None,
            vastra_names: None,
            date: slot.date,
            // Aarti passes use the fixed early-morning slot time.
            time: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default(),
            grace_minutes: settings.grace_minutes_default,
            assigned_attendant_id: attendant.id,
            qr_code_string: generate_qr_string(),
            trustee_note: Some(format!("Aarti: {}", slot.name)),
        };

        let pass = self.pass_repo.insert_pass(&mut *tx, &new_pass).await?;
        self.aarti_repo
            .increment_booked(&mut *tx, slot.id, payload.count)
            .await?;

        self.log_repo
            .record(
                &mut *tx,
                issuer.id,
                "BOOK_AARTI",
                "AARTI",
                Some(slot.id),
                serde_json::to_value(&payload)
                    .map_err(|e| AppError::InternalServerError(e.into()))?,
            )
            .await?;

        tx.commit().await?;
        Ok((pass, attendant))
    }

    /// Today's passes, filtered by who is asking: trustees see what they
    /// issued, attendants what they escort, admins everything.
    pub async fn today_passes(&self, user: &User) -> Result<Vec<PassWithNames>, AppError> {
        let today = Local::now().date_naive();
        match user.role {
            Role::Trustee => self.pass_repo.today_for_trustee(user.id, today).await,
            Role::Attendant => self.pass_repo.today_for_attendant(user.id, today).await,
            _ => self.pass_repo.today_all(today).await,
        }
    }

    pub async fn pass_detail(
        &self,
        pass_id: Uuid,
    ) -> Result<(PassWithNames, Vec<Scan>), AppError> {
        let pass = self
            .pass_repo
            .find_detail(pass_id)
            .await?
            .ok_or(AppError::PassNotFound)?;
        let timeline = self.pass_repo.list_scans(pass_id).await?;
        Ok((pass, timeline))
    }
}

#[cfg(test)]
mod tests {
    use super::generate_qr_string;
    use crate::models::{pass::NewPass, settings::Settings};
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    #[test]
    fn qr_string_has_the_expected_shape() {
        let qr = generate_qr_string();
        assert!(qr.starts_with("SV-"));
        assert_eq!(qr.len(), 15);
        assert!(
            qr[3..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn qr_strings_do_not_repeat() {
        let a = generate_qr_string();
        let b = generate_qr_string();
        assert_ne!(a, b);
    }

    #[test]
    fn grace_minutes_are_snapshotted_not_referenced() {
        let mut settings = Settings {
            id: 1,
            grace_minutes_default: 30,
            max_visitors_per_attendant: None,
            updated_at: Utc::now(),
        };

        let new_pass = NewPass {
            trustee_id: Uuid::new_v4(),
            assistant_id: None,
            visitor_name: "Asha Patil".to_string(),
            visitor_phone: "9820000000".to_string(),
            visitor_email: None,
            total_people: 2,
            darshan_type: "NORMAL".to_string(),
            vastra_count: None,
            vastra_names: None,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            grace_minutes: settings.grace_minutes_default,
            assigned_attendant_id: Uuid::new_v4(),
            qr_code_string: generate_qr_string(),
            trustee_note: None,
        };

        // A later settings change never touches an issued pass.
        settings.grace_minutes_default = 45;
        assert_eq!(new_pass.grace_minutes, 30);
    }
}
