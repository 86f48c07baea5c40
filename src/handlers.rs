pub mod aarti;
pub mod admin;
pub mod attendant;
pub mod auth;
pub mod passes;
pub mod scanner;
