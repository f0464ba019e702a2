use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, system};

/// All application routes
///
/// `max_upload_bytes` caps the request body of the CSV upload routes.
pub fn configure_routes(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route(
            "/api/system/auth/register",
            post(system::handlers::auth::register),
        )
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/refresh",
            post(system::handlers::auth::refresh),
        )
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        .merge(protected_routes(max_upload_bytes))
}

/// Everything below requires a bearer token
fn protected_routes(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/system/auth/me", get(system::handlers::auth::current_user))
        // A001 Students + device loans
        .route(
            "/api/students",
            get(handlers::a001_student::list_all).post(handlers::a001_student::create),
        )
        .route("/api/students/:id", get(handlers::a001_student::get_by_id))
        .route(
            "/api/students/:id/toggle-active",
            post(handlers::a001_student::toggle_active),
        )
        .route(
            "/api/loans",
            get(handlers::a003_loan::list_all).post(handlers::a003_loan::borrow),
        )
        .route("/api/loans/return", post(handlers::a003_loan::return_device))
        // A002 Employees + A004 assessments
        .route(
            "/api/employees",
            get(handlers::a002_employee::list_all).post(handlers::a002_employee::create),
        )
        .route("/api/employees/:id", get(handlers::a002_employee::get_profile))
        .route(
            "/api/employees/:id/assessments",
            post(handlers::a004_assessment::create),
        )
        // U501 bulk CSV upload
        .merge(upload_routes(max_upload_bytes))
        .route_layer(middleware::from_fn(system::auth::middleware::require_auth))
}

fn upload_routes(max_upload_bytes: usize) -> Router {
    Router::new()
        .route(
            "/api/students/upload",
            post(handlers::u501_bulk_import::upload_students),
        )
        .route(
            "/api/employees/upload",
            post(handlers::u501_bulk_import::upload_employees),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

