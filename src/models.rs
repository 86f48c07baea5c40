pub mod aarti;
pub mod admin;
pub mod attendance;
pub mod auth;
pub mod pass;
pub mod settings;
