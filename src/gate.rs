//! Admin page gate: session check, then data fetch, then render.
//!
//! Every admin page (HTML or JSON) is a call to [`render_admin_page`] with a
//! page-specific fetch and render function. The gate owns the control flow and
//! nothing else. It does not log or retry, and hands the dataset to the renderer
//! as fetched. Its current stage is recorded on a debug span.

use axum::response::{IntoResponse, Redirect, Response};
use std::future::Future;
use tracing::Instrument;

use crate::{
    auth::Session,
    error::{AuthBackendError, DataBackendError, GateError},
};

/// Where callers without a session are sent.
pub const LOGIN_ROUTE: &str = "/admin/auth";

/// Per-request progress through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStage {
    Start,
    CheckingSession,
    Redirecting,
    FetchingData,
    Rendering,
    Failed,
}

impl GateStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Redirecting | Self::Rendering | Self::Failed)
    }
}

/// PageOutcome
///
/// Terminal result of one pass through the gate.
#[derive(Debug)]
pub enum PageOutcome<O> {
    /// No valid session: the only output is a redirect to `location`.
    Redirected { location: &'static str },
    /// The renderer's output for the fetched dataset.
    Rendered(O),
    /// A backend collaborator failed; the error is carried unchanged.
    Failed(GateError),
}

impl<O> PageOutcome<O> {
    /// The terminal stage this outcome corresponds to.
    pub fn stage(&self) -> GateStage {
        match self {
            Self::Redirected { .. } => GateStage::Redirecting,
            Self::Rendered(_) => GateStage::Rendering,
            Self::Failed(_) => GateStage::Failed,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirected { .. })
    }

    /// Returns the rendered output, if the gate got that far.
    pub fn rendered(self) -> Option<O> {
        match self {
            Self::Rendered(output) => Some(output),
            _ => None,
        }
    }
}

impl<O: IntoResponse> IntoResponse for PageOutcome<O> {
    fn into_response(self) -> Response {
        match self {
            Self::Redirected { location } => Redirect::to(location).into_response(),
            Self::Rendered(output) => output.into_response(),
            Self::Failed(err) => err.into_response(),
        }
    }
}

/// render_admin_page
///
/// Runs the gate for one request:
///
/// 1. `fetch_session` is awaited. An `AuthBackendError` ends the request as `Failed`.
/// 2. No session ends the request as `Redirected` to [`LOGIN_ROUTE`]; `fetch_data`
///    is never called.
/// 3. `fetch_data` is awaited. A `DataBackendError` ends the request as `Failed`;
///    `render` is never called.
/// 4. `render` receives the dataset as fetched.
///
/// Each capability is called at most once and the calls never overlap. Dropping
/// the returned future abandons whichever backend call is in flight.
pub async fn render_admin_page<FS, SF, FD, DF, T, R, O>(
    fetch_session: FS,
    fetch_data: FD,
    render: R,
) -> PageOutcome<O>
where
    FS: FnOnce() -> SF,
    SF: Future<Output = Result<Option<Session>, AuthBackendError>>,
    FD: FnOnce() -> DF,
    DF: Future<Output = Result<T, DataBackendError>>,
    R: FnOnce(T) -> O,
{
    let span = tracing::debug_span!("admin_gate", stage = ?GateStage::Start);
    run_gate(fetch_session, fetch_data, render)
        .instrument(span)
        .await
}

async fn run_gate<FS, SF, FD, DF, T, R, O>(
    fetch_session: FS,
    fetch_data: FD,
    render: R,
) -> PageOutcome<O>
where
    FS: FnOnce() -> SF,
    SF: Future<Output = Result<Option<Session>, AuthBackendError>>,
    FD: FnOnce() -> DF,
    DF: Future<Output = Result<T, DataBackendError>>,
    R: FnOnce(T) -> O,
{
    let span = tracing::Span::current();
    let enter = |stage: GateStage| {
        span.record("stage", tracing::field::debug(stage));
    };

    enter(GateStage::CheckingSession);
    match fetch_session().await {
        Ok(Some(_)) => {}
        Ok(None) => {
            enter(GateStage::Redirecting);
            return PageOutcome::Redirected {
                location: LOGIN_ROUTE,
            };
        }
        Err(err) => {
            enter(GateStage::Failed);
            return PageOutcome::Failed(err.into());
        }
    }

    enter(GateStage::FetchingData);
    let dataset = match fetch_data().await {
        Ok(dataset) => dataset,
        Err(err) => {
            enter(GateStage::Failed);
            return PageOutcome::Failed(err.into());
        }
    };

    enter(GateStage::Rendering);
    PageOutcome::Rendered(render(dataset))
}
