// src/models/attendance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// One clock-in/clock-out record per attendant per day.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub attendant_id: Uuid,
    pub date: NaiveDate,
    pub time_in: Option<DateTime<Utc>>,
    pub time_out: Option<DateTime<Utc>>,
    /// Derived once at clock-out, in hours.
    #[schema(value_type = Option<f64>)]
    pub total_hours: Option<Decimal>,
}

/// An attendance record joined with the attendant's identity, for the
/// admin listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceWithName {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub attendant_name: String,
    pub attendant_phone: String,
}

/// Elapsed time between clock-in and clock-out as decimal hours,
/// rounded to two places.
pub fn worked_hours(time_in: DateTime<Utc>, time_out: DateTime<Utc>) -> Decimal {
    let seconds = (time_out - time_in).num_seconds();
    (Decimal::from(seconds) / Decimal::from(3600)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn two_hour_shift_yields_two_hours() {
        let time_in = Utc::now();
        let time_out = time_in + Duration::hours(2);
        assert_eq!(worked_hours(time_in, time_out), Decimal::from(2));
    }

    #[test]
    fn partial_hours_round_to_two_places() {
        let time_in = Utc::now();
        // 90 minutes.
        let time_out = time_in + Duration::minutes(90);
        assert_eq!(worked_hours(time_in, time_out), Decimal::new(150, 2));

        // 100 seconds = 0.0277... hours, rounds to 0.03.
        let time_out = time_in + Duration::seconds(100);
        assert_eq!(worked_hours(time_in, time_out), Decimal::new(3, 2));
    }

    #[test]
    fn zero_gap_is_zero_hours() {
        let now = Utc::now();
        assert_eq!(worked_hours(now, now), Decimal::ZERO);
    }
}
