use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// AuthBackendError
///
/// Transport or availability failure of the identity service (Supabase GoTrue).
/// A missing or rejected token is *not* an error: it resolves to "no session".
#[derive(Error, Debug)]
pub enum AuthBackendError {
    #[error("auth backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("auth backend returned unexpected status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("auth backend returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// DataBackendError
///
/// Transport or query failure of the data service. No partial-success semantics:
/// any failure discards the whole dataset.
#[derive(Error, Debug)]
pub enum DataBackendError {
    #[error("data backend query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("data backend unavailable: {0}")]
    Unavailable(String),
}

/// GateError
///
/// The fatal outcomes of the admin page gate. Both variants carry the
/// collaborator's error unchanged.
#[derive(Error, Debug)]
pub enum GateError {
    #[error(transparent)]
    Auth(#[from] AuthBackendError),

    #[error(transparent)]
    Data(#[from] DataBackendError),
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let source = match &self {
            GateError::Auth(_) => "auth",
            GateError::Data(_) => "data",
        };
        tracing::error!(backend = source, error = %self, "admin page request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(crate::templates::render_error_page(
                "The admin backend is unavailable. Please try again shortly.",
            )),
        )
            .into_response()
    }
}
