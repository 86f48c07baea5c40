pub mod aarti_service;
pub mod admin_service;
pub mod attendant_service;
pub mod auth;
pub mod pass_service;
pub mod scanner_service;
pub mod ticket_service;

pub use aarti_service::AartiService;
pub use admin_service::AdminService;
pub use attendant_service::AttendantService;
pub use auth::AuthService;
pub use pass_service::PassService;
pub use scanner_service::ScannerService;
pub use ticket_service::TicketService;
