// src/services/aarti_service.rs

use chrono::{Local, NaiveDate};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{AartiRepository, LogRepository},
    models::{
        aarti::{AartiSlot, SlotStatus, UpsertAartiPayload},
        auth::User,
    },
};

// The slot registry's administrative side: listing and the (name, date)
// capacity upsert. Booking lives in PassService, because a booking is a
// pass creation.
#[derive(Clone)]
pub struct AartiService {
    aarti_repo: AartiRepository,
    log_repo: LogRepository,
    pool: PgPool,
}

impl AartiService {
    pub fn new(aarti_repo: AartiRepository, log_repo: LogRepository, pool: PgPool) -> Self {
        Self {
            aarti_repo,
            log_repo,
            pool,
        }
    }

    /// Slots for a date, defaulting to today.
    pub async fn list_slots(&self, date: Option<NaiveDate>) -> Result<Vec<AartiSlot>, AppError> {
        let date = date.unwrap_or_else(|| Local::now().date_naive());
        self.aarti_repo.list_by_date(date).await
    }

    /// Creates or resizes a slot. An existing slot keeps its bookings;
    /// status defaults to OPEN.
    pub async fn upsert_slot(
        &self,
        actor: &User,
        payload: UpsertAartiPayload,
    ) -> Result<AartiSlot, AppError> {
        let mut tx = self.pool.begin().await?;

        let slot = self
            .aarti_repo
            .upsert_slot(
                &mut *tx,
                &payload.name,
                payload.date,
                payload.total_capacity,
                payload.status.unwrap_or(SlotStatus::Open),
            )
            .await?;

        self.log_repo
            .record(
                &mut *tx,
                actor.id,
                "UPSERT_AARTI",
                "AARTI",
                Some(slot.id),
                json!({ "name": payload.name, "date": payload.date, "totalCapacity": payload.total_capacity }),
            )
            .await?;

        tx.commit().await?;
        Ok(slot)
    }
}
