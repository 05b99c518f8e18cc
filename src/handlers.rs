use crate::{
    AppState,
    auth::{SESSION_COOKIE, SessionCredentials},
    config::Env,
    gate::{LOGIN_ROUTE, PageOutcome, render_admin_page},
    models::{AnalyticsSummary, AuditLogEntry, FarmPage, FarmsQuery, PageWindow, SignInForm},
    templates,
};
use axum::{
    Form, Json,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};

/// Landing page after a successful sign-in.
pub const ADMIN_HOME: &str = "/admin";

// --- Admin Pages (HTML) ---

/// analytics_page
///
/// [Admin Page] Dashboard counters. Anonymous callers are redirected to the sign-in page.
pub async fn analytics_page(
    State(state): State<AppState>,
    credentials: SessionCredentials,
) -> PageOutcome<Html<String>> {
    render_admin_page(
        || state.sessions.get_current_session(credentials.access_token()),
        || state.repo.get_analytics_data(),
        templates::render_analytics,
    )
    .await
}

/// audit_logs_page
///
/// [Admin Page] Most recent audit events. An empty log still renders the page.
pub async fn audit_logs_page(
    State(state): State<AppState>,
    credentials: SessionCredentials,
) -> PageOutcome<Html<String>> {
    render_admin_page(
        || state.sessions.get_current_session(credentials.access_token()),
        || state.repo.get_audit_logs(),
        templates::render_audit_logs,
    )
    .await
}

/// farms_page
///
/// [Admin Page] One window of farms with page controls. `limit` defaults to the
/// configured page size; `offset` defaults to 0.
pub async fn farms_page(
    State(state): State<AppState>,
    credentials: SessionCredentials,
    Query(query): Query<FarmsQuery>,
) -> PageOutcome<Html<String>> {
    let window = farms_window(&state, &query);

    render_admin_page(
        || state.sessions.get_current_session(credentials.access_token()),
        || state.repo.get_all_farms(window.limit, window.offset),
        move |page| templates::render_farms(page, window),
    )
    .await
}

fn farms_window(state: &AppState, query: &FarmsQuery) -> PageWindow {
    PageWindow::from_request(query.limit, query.offset, state.config.farms_page_size)
}

// --- Admin API (JSON) ---

/// get_analytics
///
/// [Admin API] Dashboard counters as JSON.
#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    responses(
        (status = 200, description = "Analytics summary", body = AnalyticsSummary),
        (status = 303, description = "No session, redirected to /admin/auth"),
        (status = 500, description = "Auth or data backend failure")
    )
)]
pub async fn get_analytics(
    State(state): State<AppState>,
    credentials: SessionCredentials,
) -> PageOutcome<Json<AnalyticsSummary>> {
    render_admin_page(
        || state.sessions.get_current_session(credentials.access_token()),
        || state.repo.get_analytics_data(),
        Json,
    )
    .await
}

/// get_audit_logs
///
/// [Admin API] Most recent audit events as JSON, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    responses(
        (status = 200, description = "Audit log entries", body = [AuditLogEntry]),
        (status = 303, description = "No session, redirected to /admin/auth"),
        (status = 500, description = "Auth or data backend failure")
    )
)]
pub async fn get_audit_logs(
    State(state): State<AppState>,
    credentials: SessionCredentials,
) -> PageOutcome<Json<Vec<AuditLogEntry>>> {
    render_admin_page(
        || state.sessions.get_current_session(credentials.access_token()),
        || state.repo.get_audit_logs(),
        Json,
    )
    .await
}

/// get_farms
///
/// [Admin API] One window of farms plus the total farm count.
#[utoipa::path(
    get,
    path = "/api/admin/farms",
    params(FarmsQuery),
    responses(
        (status = 200, description = "Farm page", body = FarmPage),
        (status = 303, description = "No session, redirected to /admin/auth"),
        (status = 500, description = "Auth or data backend failure")
    )
)]
pub async fn get_farms(
    State(state): State<AppState>,
    credentials: SessionCredentials,
    Query(query): Query<FarmsQuery>,
) -> PageOutcome<Json<FarmPage>> {
    let window = farms_window(&state, &query);

    render_admin_page(
        || state.sessions.get_current_session(credentials.access_token()),
        || state.repo.get_all_farms(window.limit, window.offset),
        Json,
    )
    .await
}

// --- Authentication Landing ---

/// sign_in_page
///
/// [Public Page] Shows the sign-in form, or sends already signed-in admins home.
/// A failing auth backend is logged and treated as signed out so the form stays reachable.
pub async fn sign_in_page(
    State(state): State<AppState>,
    credentials: SessionCredentials,
) -> Response {
    match state
        .sessions
        .get_current_session(credentials.access_token())
        .await
    {
        Ok(Some(_)) => Redirect::to(ADMIN_HOME).into_response(),
        Ok(None) => templates::render_sign_in(None).into_response(),
        Err(e) => {
            tracing::warn!("session check failed on sign-in page: {}", e);
            templates::render_sign_in(None).into_response()
        }
    }
}

/// sign_in_submit
///
/// [Public Page] Exchanges the posted credentials for a Supabase session and stores
/// the access token in an HttpOnly cookie scoped to `/admin`.
pub async fn sign_in_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignInForm>,
) -> Response {
    let tokens = match state
        .sessions
        .sign_in_with_password(&form.email, &form.password)
        .await
    {
        Ok(Some(tokens)) => tokens,
        Ok(None) => {
            return templates::render_sign_in(Some("Invalid email or password".to_string()))
                .into_response();
        }
        Err(e) => {
            tracing::error!("sign-in error: {}", e);
            return templates::render_sign_in(Some(
                "An error occurred. Please try again.".to_string(),
            ))
            .into_response();
        }
    };

    let cookie = Cookie::build((SESSION_COOKIE, tokens.access_token))
        .path(ADMIN_HOME)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.config.env == Env::Production);

    (jar.add(cookie), Redirect::to(ADMIN_HOME)).into_response()
}

/// sign_out
///
/// [Public Page] Revokes the session upstream (best effort), clears the cookie and
/// returns to the sign-in page.
pub async fn sign_out(
    State(state): State<AppState>,
    credentials: SessionCredentials,
    jar: CookieJar,
) -> Response {
    if let Some(token) = credentials.access_token() {
        if let Err(e) = state.sessions.sign_out(token).await {
            tracing::error!("failed to revoke session: {}", e);
        }
    }

    let cookie = Cookie::build(SESSION_COOKIE).path(ADMIN_HOME);
    (jar.remove(cookie), Redirect::to(LOGIN_ROUTE)).into_response()
}
