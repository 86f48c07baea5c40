// src/models/pass.rs
//
// Pass rows plus the pure lifecycle rules: the status enumeration, the
// status<->scan-stage mappings and the note/entry checks. Anything that
// touches the database lives in db/pass_repo.rs.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length of a single attendant note, in characters.
pub const MAX_NOTE_CHARS: usize = 100;

/// Lifecycle states of a pass.
///
/// NOT_CONTACTED -> CONTACTED -> REACHED -> AT_GATE -> COMPLETED is the
/// happy path. ISSUE can be forced from any state and nothing guards the
/// way back out of it. CANCELLED and EXPIRED are recognized as terminal by
/// the entry check but are never produced by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pass_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassStatus {
    NotContacted,
    Contacted,
    Reached,
    AtGate,
    Completed,
    Issue,
    Cancelled,
    Expired,
}

/// Timeline stages recorded in the scan log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "scan_stage", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStage {
    Arrived,
    AtGate,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "scan_source", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanSource {
    Attendant,
    Scanner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "issue_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Late,
    DuplicateQr,
    NoShow,
    Other,
}

/// Why a pass was refused at the entry pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDenial {
    /// CANCELLED or EXPIRED.
    Invalid(PassStatus),
    AlreadyCompleted,
}

impl PassStatus {
    /// Statuses an attendant may set directly via update-status.
    pub fn attendant_settable(self) -> bool {
        matches!(
            self,
            PassStatus::Reached | PassStatus::AtGate | PassStatus::Completed | PassStatus::Issue
        )
    }

    /// The scan-log stage recorded when an attendant moves a pass to this
    /// status. ISSUE (and the states attendants cannot set) record nothing.
    pub fn scan_stage(self) -> Option<ScanStage> {
        match self {
            PassStatus::Reached => Some(ScanStage::Arrived),
            PassStatus::AtGate => Some(ScanStage::AtGate),
            PassStatus::Completed => Some(ScanStage::Completed),
            _ => None,
        }
    }

    /// Read-only gate pre-check. `None` means the pass may proceed.
    pub fn entry_denial(self) -> Option<EntryDenial> {
        match self {
            PassStatus::Cancelled | PassStatus::Expired => Some(EntryDenial::Invalid(self)),
            PassStatus::Completed => Some(EntryDenial::AlreadyCompleted),
            _ => None,
        }
    }
}

impl ScanStage {
    /// The pass status implied by a scanner recording this stage.
    pub fn as_status(self) -> PassStatus {
        match self {
            ScanStage::Arrived => PassStatus::Reached,
            ScanStage::AtGate => PassStatus::AtGate,
            ScanStage::Completed => PassStatus::Completed,
        }
    }
}

/// Trim and length-check a free-text attendant note. Returns the trimmed
/// note, or `None` when empty or over [`MAX_NOTE_CHARS`] characters.
pub fn validate_note(note: &str) -> Option<&str> {
    let trimmed = note.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NOTE_CHARS {
        return None;
    }
    Some(trimmed)
}

/// One entry of the ordered attendant note sequence, stored as JSONB on the
/// pass row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendantNote {
    pub user_id: Uuid,
    pub note: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pass {
    pub id: Uuid,
    pub trustee_id: Uuid,
    pub assistant_id: Option<Uuid>,
    pub visitor_name: String,
    pub visitor_phone: String,
    pub visitor_email: Option<String>,
    pub total_people: i32,
    pub darshan_type: String,
    pub vastra_count: Option<i32>,
    #[schema(value_type = Option<Vec<String>>)]
    pub vastra_names: Option<Json<Vec<String>>>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Snapshot of the settings default at creation time, never re-read.
    pub grace_minutes: i32,
    pub assigned_attendant_id: Uuid,
    pub qr_code_string: String,
    pub status: PassStatus,
    #[schema(value_type = Vec<AttendantNote>)]
    pub attendant_notes: Json<Vec<AttendantNote>>,
    pub trustee_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for direct pass creation. Also serialized verbatim into
/// the audit log entry for the operation.
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePassPayload {
    #[validate(length(min = 1, message = "visitor_name is required."))]
    pub visitor_name: String,
    #[validate(length(min = 1, message = "visitor_phone is required."))]
    pub visitor_phone: String,
    #[validate(email(message = "Invalid email address."))]
    pub visitor_email: Option<String>,
    #[validate(range(min = 1, message = "total_people must be at least 1."))]
    pub total_people: i32,
    #[validate(length(min = 1, message = "darshan_type is required."))]
    pub darshan_type: String,
    #[validate(range(min = 0, message = "vastra_count cannot be negative."))]
    pub vastra_count: Option<i32>,
    pub vastra_names: Option<Vec<String>>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub assistant_id: Option<Uuid>,
    pub trustee_note: Option<String>,
}

/// Everything needed to insert a pass. Built by the services after the
/// settings snapshot, attendant assignment and QR generation have run.
#[derive(Debug, Clone)]
pub struct NewPass {
    pub trustee_id: Uuid,
    pub assistant_id: Option<Uuid>,
    pub visitor_name: String,
    pub visitor_phone: String,
    pub visitor_email: Option<String>,
    pub total_people: i32,
    pub darshan_type: String,
    pub vastra_count: Option<i32>,
    pub vastra_names: Option<Vec<String>>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub grace_minutes: i32,
    pub assigned_attendant_id: Uuid,
    pub qr_code_string: String,
    pub trustee_note: Option<String>,
}

/// A pass joined with the names of its trustee and attendant, for listings
/// and gate lookups.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub pass: Pass,
    pub trustee_name: Option<String>,
    pub attendant_name: Option<String>,
    pub attendant_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    pub id: Uuid,
    pub pass_id: Uuid,
    pub stage: ScanStage,
    pub source: ScanSource,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PassStatus::Reached, Some(ScanStage::Arrived))]
    #[case(PassStatus::AtGate, Some(ScanStage::AtGate))]
    #[case(PassStatus::Completed, Some(ScanStage::Completed))]
    #[case(PassStatus::Issue, None)]
    #[case(PassStatus::NotContacted, None)]
    #[case(PassStatus::Contacted, None)]
    fn attendant_updates_map_to_scan_stages(
        #[case] status: PassStatus,
        #[case] expected: Option<ScanStage>,
    ) {
        assert_eq!(status.scan_stage(), expected);
    }

    #[rstest]
    #[case(ScanStage::Arrived, PassStatus::Reached)]
    #[case(ScanStage::AtGate, PassStatus::AtGate)]
    #[case(ScanStage::Completed, PassStatus::Completed)]
    fn scanner_stages_map_to_statuses(#[case] stage: ScanStage, #[case] expected: PassStatus) {
        assert_eq!(stage.as_status(), expected);
    }

    #[rstest]
    #[case(PassStatus::Reached, true)]
    #[case(PassStatus::AtGate, true)]
    #[case(PassStatus::Completed, true)]
    #[case(PassStatus::Issue, true)]
    #[case(PassStatus::NotContacted, false)]
    #[case(PassStatus::Contacted, false)]
    #[case(PassStatus::Cancelled, false)]
    #[case(PassStatus::Expired, false)]
    fn attendant_settable_statuses(#[case] status: PassStatus, #[case] expected: bool) {
        assert_eq!(status.attendant_settable(), expected);
    }

    #[test]
    fn entry_check_rejects_terminal_and_completed_passes() {
        assert_eq!(
            PassStatus::Cancelled.entry_denial(),
            Some(EntryDenial::Invalid(PassStatus::Cancelled))
        );
        assert_eq!(
            PassStatus::Expired.entry_denial(),
            Some(EntryDenial::Invalid(PassStatus::Expired))
        );
        assert_eq!(
            PassStatus::Completed.entry_denial(),
            Some(EntryDenial::AlreadyCompleted)
        );
    }

    #[rstest]
    #[case(PassStatus::NotContacted)]
    #[case(PassStatus::Contacted)]
    #[case(PassStatus::Reached)]
    #[case(PassStatus::AtGate)]
    #[case(PassStatus::Issue)]
    fn entry_check_admits_in_flight_passes(#[case] status: PassStatus) {
        assert_eq!(status.entry_denial(), None);
    }

    #[test]
    fn note_validation_trims_and_bounds_length() {
        assert_eq!(validate_note("  reached out  "), Some("reached out"));
        assert_eq!(validate_note(""), None);
        assert_eq!(validate_note("   "), None);

        let exactly_100 = "x".repeat(100);
        assert_eq!(validate_note(&exactly_100), Some(exactly_100.as_str()));

        let too_long = "x".repeat(101);
        assert_eq!(validate_note(&too_long), None);
    }

    #[test]
    fn note_length_counts_characters_not_bytes() {
        // 100 multi-byte characters are still within bounds.
        let hindi = "अ".repeat(100);
        assert!(hindi.len() > 100);
        assert_eq!(validate_note(&hindi), Some(hindi.as_str()));
    }

    #[test]
    fn statuses_serialize_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&PassStatus::NotContacted).unwrap(),
            "\"NOT_CONTACTED\""
        );
        assert_eq!(
            serde_json::to_string(&PassStatus::AtGate).unwrap(),
            "\"AT_GATE\""
        );
        assert_eq!(
            serde_json::to_string(&IssueType::DuplicateQr).unwrap(),
            "\"DUPLICATE_QR\""
        );
    }
}
