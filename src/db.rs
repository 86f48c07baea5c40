pub mod aarti_repo;
pub use aarti_repo::AartiRepository;
pub mod attendance_repo;
pub use attendance_repo::AttendanceRepository;
pub mod log_repo;
pub use log_repo::LogRepository;
pub mod pass_repo;
pub use pass_repo::PassRepository;
pub mod reports_repo;
pub use reports_repo::ReportsRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
