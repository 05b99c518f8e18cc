use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session. The sign-in routes are nested under
/// `/admin/auth`, the target of every gate redirect.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /admin/auth shows the sign-in form (or redirects home when signed in).
        // POST /admin/auth exchanges email + password for a Supabase session cookie.
        .route(
            "/admin/auth",
            get(handlers::sign_in_page).post(handlers::sign_in_submit),
        )
        // POST /admin/auth/logout
        // Revokes the session and clears the cookie.
        .route("/admin/auth/logout", post(handlers::sign_out))
}
