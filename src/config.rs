// src/config.rs

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        AartiRepository, AttendanceRepository, LogRepository, PassRepository, ReportsRepository,
        SettingsRepository, UserRepository,
    },
    services::{
        AartiService, AdminService, AttendantService, AuthService, PassService, ScannerService,
        TicketService,
    },
};

// Shared application state: the pool and the assembled service graph.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub pass_service: PassService,
    pub aarti_service: AartiService,
    pub attendant_service: AttendantService,
    pub scanner_service: ScannerService,
    pub admin_service: AdminService,
    pub ticket_service: TicketService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Database connection established");

        // --- Assemble the dependency graph ---
        let user_repo = UserRepository::new(db_pool.clone());
        let pass_repo = PassRepository::new(db_pool.clone());
        let aarti_repo = AartiRepository::new(db_pool.clone());
        let attendance_repo = AttendanceRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());
        let reports_repo = ReportsRepository::new(db_pool.clone());
        let log_repo = LogRepository::new();

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let pass_service = PassService::new(
            pass_repo.clone(),
            user_repo.clone(),
            aarti_repo.clone(),
            settings_repo.clone(),
            log_repo.clone(),
            db_pool.clone(),
        );
        let aarti_service =
            AartiService::new(aarti_repo.clone(), log_repo.clone(), db_pool.clone());
        let attendant_service = AttendantService::new(
            pass_repo.clone(),
            attendance_repo.clone(),
            log_repo.clone(),
            db_pool.clone(),
        );
        let scanner_service =
            ScannerService::new(pass_repo.clone(), log_repo.clone(), db_pool.clone());
        let admin_service = AdminService::new(
            user_repo,
            attendance_repo,
            settings_repo,
            reports_repo,
            log_repo,
            db_pool.clone(),
        );
        let ticket_service = TicketService::new(pass_repo);

        Ok(Self {
            db_pool,
            auth_service,
            pass_service,
            aarti_service,
            attendant_service,
            scanner_service,
            admin_service,
            ticket_service,
        })
    }
}
