//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Failed to initialise application state.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Failed to run database migrations.");

    tracing::info!("Database migrations applied");

    // Tokens are stateless, so both auth routes are public; logout is
    // just a uniform endpoint for clients discarding a token.
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout));

    let pass_routes = Router::new()
        .route("/", post(handlers::passes::create_pass))
        .route("/today", get(handlers::passes::get_today_passes))
        .route("/{pass_id}", get(handlers::passes::get_pass_detail))
        .route("/{pass_id}/ticket", get(handlers::passes::get_pass_ticket))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let aarti_routes = Router::new()
        .route("/", get(handlers::aarti::get_aarti_slots))
        .route("/book", post(handlers::aarti::book_aarti))
        .route(
            "/update-capacity",
            post(handlers::aarti::update_aarti_capacity),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let attendant_routes = Router::new()
        .route("/assigned", get(handlers::attendant::get_assigned_passes))
        .route("/upcoming", get(handlers::attendant::get_upcoming_passes))
        .route("/mark-contacted", post(handlers::attendant::mark_contacted))
        .route("/update-status", post(handlers::attendant::update_status))
        .route("/add-note", post(handlers::attendant::add_note))
        .route(
            "/attendance/in",
            post(handlers::attendant::mark_attendance_in),
        )
        .route(
            "/attendance/out",
            post(handlers::attendant::mark_attendance_out),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let scanner_routes = Router::new()
        .route("/scan-qr", post(handlers::scanner::scan_qr))
        .route("/update-status", post(handlers::scanner::update_status))
        .route("/issue", post(handlers::scanner::report_issue))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let admin_routes = Router::new()
        .route("/users", post(handlers::admin::create_user))
        .route("/users/{id}", patch(handlers::admin::update_user))
        .route("/attendance", get(handlers::admin::get_attendance))
        .route("/performance", get(handlers::admin::get_performance))
        .route("/settings", patch(handlers::admin::update_settings))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/passes", pass_routes)
        .nest("/api/aarti", aarti_routes)
        .nest("/api/attendant", attendant_routes)
        .nest("/api/scanner", scanner_routes)
        .nest("/api/admin", admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind TCP listener");
    tracing::info!("Server listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Axum server error");
}
