use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin API Router Module
///
/// JSON versions of the admin pages, nested under `/api/admin`. Same gate, a JSON
/// renderer instead of a template.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(handlers::get_analytics))
        .route("/audit-logs", get(handlers::get_audit_logs))
        .route("/farms", get(handlers::get_farms))
}
