// src/models/aarti.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "slot_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Open,
    Closed,
}

/// A named ritual slot on a given date with bounded visitor capacity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AartiSlot {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub total_capacity: i32,
    pub booked_capacity: i32,
    pub status: SlotStatus,
}

/// Why a booking request against a slot was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRefusal {
    Closed,
    /// The request does not fit; carries the exact remaining capacity.
    CapacityExceeded { remaining: i32 },
}

impl AartiSlot {
    pub fn remaining_capacity(&self) -> i32 {
        self.total_capacity - self.booked_capacity
    }

    /// Check whether `count` seats can be booked against this slot.
    /// The registry re-runs this under a row lock before incrementing.
    pub fn check_bookable(&self, count: i32) -> Result<(), BookingRefusal> {
        if self.status == SlotStatus::Closed {
            return Err(BookingRefusal::Closed);
        }
        if self.remaining_capacity() < count {
            return Err(BookingRefusal::CapacityExceeded {
                remaining: self.remaining_capacity(),
            });
        }
        Ok(())
    }
}

/// Request body for booking seats in a slot; creates a NORMAL darshan pass
/// on the slot's date. Serialized into the audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookAartiPayload {
    pub aarti_id: Uuid,
    #[validate(length(min = 1, message = "visitor_name is required."))]
    pub visitor_name: String,
    #[validate(length(min = 1, message = "visitor_phone is required."))]
    pub visitor_phone: String,
    #[validate(email(message = "Invalid email address."))]
    pub visitor_email: Option<String>,
    #[validate(range(min = 1, message = "count must be at least 1."))]
    pub count: i32,
}

/// Request body for the (name, date) capacity upsert.
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertAartiPayload {
    #[validate(length(min = 1, message = "name is required."))]
    pub name: String,
    pub date: NaiveDate,
    #[validate(range(min = 0, message = "total_capacity cannot be negative."))]
    pub total_capacity: i32,
    pub status: Option<SlotStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn slot(total: i32, booked: i32, status: SlotStatus) -> AartiSlot {
        AartiSlot {
            id: Uuid::new_v4(),
            name: "Shej Aarti".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            total_capacity: total,
            booked_capacity: booked,
            status,
        }
    }

    #[rstest]
    #[case(10, 0, 10)]
    #[case(10, 10, 0)]
    #[case(10, 3, 7)]
    fn remaining_capacity_is_total_minus_booked(
        #[case] total: i32,
        #[case] booked: i32,
        #[case] remaining: i32,
    ) {
        assert_eq!(slot(total, booked, SlotStatus::Open).remaining_capacity(), remaining);
    }

    #[test]
    fn closed_slot_refuses_any_booking() {
        let s = slot(10, 0, SlotStatus::Closed);
        assert_eq!(s.check_bookable(1), Err(BookingRefusal::Closed));
    }

    #[test]
    fn exact_fit_booking_is_accepted() {
        let s = slot(10, 0, SlotStatus::Open);
        assert_eq!(s.check_bookable(10), Ok(()));
    }

    #[test]
    fn full_slot_reports_zero_remaining() {
        let s = slot(10, 10, SlotStatus::Open);
        assert_eq!(
            s.check_bookable(1),
            Err(BookingRefusal::CapacityExceeded { remaining: 0 })
        );
    }

    #[test]
    fn shortfall_reports_exact_remaining() {
        let s = slot(10, 7, SlotStatus::Open);
        assert_eq!(
            s.check_bookable(5),
            Err(BookingRefusal::CapacityExceeded { remaining: 3 })
        );
        assert_eq!(s.check_bookable(3), Ok(()));
    }
}
