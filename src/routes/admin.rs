use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Server-rendered admin pages, nested under `/admin`. There is no middleware
/// layer here: each handler calls the admin page gate, which checks the session
/// before any data is read and redirects anonymous callers to `/admin/auth`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin
        // Analytics dashboard.
        .route("/", get(handlers::analytics_page))
        // GET /admin/audit-logs
        // Most recent audit events, newest first.
        .route("/audit-logs", get(handlers::audit_logs_page))
        // GET /admin/farms?limit=&offset=
        // Paginated farm list with the total farm count.
        .route("/farms", get(handlers::farms_page))
}
