// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,

        // --- Passes ---
        handlers::passes::create_pass,
        handlers::passes::get_today_passes,
        handlers::passes::get_pass_detail,
        handlers::passes::get_pass_ticket,

        // --- Aarti ---
        handlers::aarti::get_aarti_slots,
        handlers::aarti::book_aarti,
        handlers::aarti::update_aarti_capacity,

        // --- Attendant ---
        handlers::attendant::get_assigned_passes,
        handlers::attendant::get_upcoming_passes,
        handlers::attendant::mark_contacted,
        handlers::attendant::update_status,
        handlers::attendant::add_note,
        handlers::attendant::mark_attendance_in,
        handlers::attendant::mark_attendance_out,

        // --- Scanner ---
        handlers::scanner::scan_qr,
        handlers::scanner::update_status,
        handlers::scanner::report_issue,

        // --- Admin ---
        handlers::admin::create_user,
        handlers::admin::update_user,
        handlers::admin::get_attendance,
        handlers::admin::get_performance,
        handlers::admin::update_settings,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Passes ---
            models::pass::PassStatus,
            models::pass::ScanStage,
            models::pass::ScanSource,
            models::pass::IssueType,
            models::pass::AttendantNote,
            models::pass::CreatePassPayload,
            models::pass::Pass,
            models::pass::PassWithNames,
            models::pass::Scan,
            handlers::passes::AttendantContact,
            handlers::passes::PassCreatedResponse,
            handlers::passes::PassDetailResponse,

            // --- Aarti ---
            models::aarti::SlotStatus,
            models::aarti::AartiSlot,
            models::aarti::BookAartiPayload,
            models::aarti::UpsertAartiPayload,

            // --- Attendant payloads ---
            handlers::attendant::MarkContactedPayload,
            handlers::attendant::UpdateStatusPayload,
            handlers::attendant::AddNotePayload,

            // --- Scanner payloads ---
            handlers::scanner::ScanQrPayload,
            handlers::scanner::ScannerUpdatePayload,
            handlers::scanner::ReportIssuePayload,

            // --- Attendance & Admin ---
            models::attendance::AttendanceRecord,
            models::attendance::AttendanceWithName,
            models::admin::CreateUserPayload,
            models::admin::UserPatch,
            models::admin::SettingsPatch,
            models::admin::AttendantPerformance,
            models::settings::Settings,
        )
    ),
    tags(
        (name = "Auth", description = "Login and session handling"),
        (name = "Passes", description = "Darshan pass issuance and lookup"),
        (name = "Aarti", description = "Aarti slot listing and booking"),
        (name = "Attendant", description = "Attendant pass workflow and attendance"),
        (name = "Scanner", description = "Gate scanning and issue reporting"),
        (name = "Admin", description = "User management, settings and reports"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
