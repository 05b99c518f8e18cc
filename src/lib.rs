use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod templates;

// Routing segregated by audience (public, admin pages, admin API).
pub mod routes;
use routes::{admin, api, public};

// --- Public Re-exports ---

pub use auth::{SessionBackend, SessionState, SupabaseAuth};
pub use config::AppConfig;
pub use gate::{PageOutcome, render_admin_page};
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document for the JSON admin API, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_analytics, handlers::get_audit_logs, handlers::get_farms),
    components(
        schemas(
            models::AnalyticsSummary, models::AuditLogEntry, models::Farm,
            models::FarmPage, models::PageWindow,
        )
    ),
    tags(
        (name = "farm-admin", description = "Farm platform admin API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, immutable container for the session backend, the data backend and the
/// configuration. Cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Session backend: resolves the caller's Supabase session.
    pub sessions: SessionState,
    /// Data backend: read-only admin queries.
    pub repo: RepositoryState,
    /// Configuration loaded at startup.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, the observability layers and the shared state.
pub fn create_router(state: AppState) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Health check and the sign-in landing.
        .merge(public::public_routes())
        // Server-rendered admin pages, each guarded by the admin page gate.
        .nest("/admin", admin::admin_routes())
        // JSON admin API, same gate.
        .nest("/api/admin", api::api_routes())
        .with_state(state);

    // Outermost layers: request id generation, tracing span, id propagation.
    base_router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                MakeRequestUuid,
            ))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Builds the per-request span so every log line carries the `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
